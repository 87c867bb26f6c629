pub const MARK_TABLE_NAME: &str = "mark";
pub const VIEW_TABLE_NAME: &str = "view";

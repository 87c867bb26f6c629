use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;

use crate::database::table_names::MARK_TABLE_NAME;
use crate::entities::community::board_article_entity::TABLE_NAME as ARTICLE_TABLE_NAME;
use crate::entities::listing::job_entity::TABLE_NAME as JOB_TABLE_NAME;
use crate::entities::listing::property_entity::TABLE_NAME as PROPERTY_TABLE_NAME;
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::utils::validate_utils::serialize_thing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MarkGroup {
    Member,
    Job,
    Property,
    Article,
}

impl MarkGroup {
    pub fn table_name(&self) -> &'static str {
        match self {
            MarkGroup::Member => MEMBER_TABLE_NAME,
            MarkGroup::Job => JOB_TABLE_NAME,
            MarkGroup::Property => PROPERTY_TABLE_NAME,
            MarkGroup::Article => ARTICLE_TABLE_NAME,
        }
    }

    /// Denormalized counter on the target that tracks this group's marks.
    pub fn counter_field(&self) -> &'static str {
        match self {
            MarkGroup::Member => "member_marks",
            MarkGroup::Job => "job_marks",
            MarkGroup::Property => "property_marks",
            MarkGroup::Article => "article_marks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkModifier {
    Mark,
    Unmark,
}

impl MarkModifier {
    pub fn value(&self) -> i64 {
        match self {
            MarkModifier::Mark => 1,
            MarkModifier::Unmark => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeMarked {
    #[serde(serialize_with = "serialize_thing")]
    pub member_id: Thing,
    #[serde(serialize_with = "serialize_thing")]
    pub mark_ref_id: Thing,
    pub my_favorite: bool,
}

/// Projection shared by the views: the requesting `$member`'s mark on the row, if any.
pub fn me_marked_query_field() -> String {
    format!(
        "<-{MARK_TABLE_NAME}[WHERE in=$member].{{member_id: in, mark_ref_id: out, my_favorite: true}} AS me_marked"
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn group_targets() {
        assert_eq!(MarkGroup::Job.table_name(), "job");
        assert_eq!(MarkGroup::Job.counter_field(), "job_marks");
        assert_eq!(MarkGroup::Article.table_name(), "board_article");
        assert_eq!(MarkGroup::Member.counter_field(), "member_marks");
    }

    #[test]
    fn group_wire_names() {
        assert_eq!(MarkGroup::from_str("PROPERTY").unwrap(), MarkGroup::Property);
        assert_eq!(
            serde_json::to_value(MarkGroup::Article).unwrap(),
            serde_json::json!("ARTICLE")
        );
    }

    #[test]
    fn modifier_sign() {
        assert_eq!(MarkModifier::Mark.value() + MarkModifier::Unmark.value(), 0);
    }
}

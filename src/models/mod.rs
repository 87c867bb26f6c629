pub mod inquiry;
pub mod view;

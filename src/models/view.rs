use serde::Serialize;
use surrealdb::sql::Thing;

use crate::utils::validate_utils::serialize_thing;

pub mod board_article;
pub mod comment;
pub mod job;
pub mod member;
pub mod property;

/// Id of a record that no longer exists.
#[derive(Debug, Serialize)]
pub struct RemovedView {
    #[serde(serialize_with = "serialize_thing")]
    pub id: Thing,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::entities::community::comment_entity::{CommentGroup, CommentStatus};
use crate::middleware::utils::db_utils::ViewFieldSelector;
use crate::models::view::member::{MemberDataView, MEMBER_DATA_FIELDS};
use crate::utils::validate_utils::serialize_thing;

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(serialize_with = "serialize_thing")]
    pub id: Thing,
    pub comment_status: CommentStatus,
    pub comment_group: CommentGroup,
    pub comment_content: String,
    #[serde(serialize_with = "serialize_thing")]
    pub comment_ref_id: Thing,
    #[serde(serialize_with = "serialize_thing")]
    pub member_id: Thing,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_data: Option<MemberDataView>,
}

impl ViewFieldSelector for CommentView {
    fn get_select_query_fields() -> String {
        format!(
            "id,
        comment_status,
        comment_group,
        comment_content,
        comment_ref_id,
        member_id,
        created_at,
        updated_at,
        {MEMBER_DATA_FIELDS}"
        )
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::entities::community::board_article_entity::{BoardArticleCategory, BoardArticleStatus};
use crate::entities::mark::{me_marked_query_field, MeMarked};
use crate::middleware::utils::db_utils::ViewFieldSelector;
use crate::models::view::member::{MemberDataView, MEMBER_DATA_FIELDS};
use crate::utils::validate_utils::serialize_thing;

#[derive(Debug, Serialize, Deserialize)]
pub struct BoardArticleView {
    #[serde(serialize_with = "serialize_thing")]
    pub id: Thing,
    pub article_category: BoardArticleCategory,
    pub article_status: BoardArticleStatus,
    pub article_title: String,
    pub article_content: String,
    pub article_image: Option<String>,
    #[serde(serialize_with = "serialize_thing")]
    pub member_id: Thing,
    pub article_views: i64,
    pub article_marks: i64,
    pub article_comments: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_data: Option<MemberDataView>,
    #[serde(default)]
    pub me_marked: Vec<MeMarked>,
}

impl ViewFieldSelector for BoardArticleView {
    fn get_select_query_fields() -> String {
        format!(
            "id,
        article_category,
        article_status,
        article_title,
        article_content,
        article_image,
        member_id,
        article_views,
        article_marks,
        article_comments,
        created_at,
        updated_at,
        {MEMBER_DATA_FIELDS},
        {}",
            me_marked_query_field()
        )
    }
}

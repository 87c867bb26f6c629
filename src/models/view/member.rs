use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::entities::mark::{me_marked_query_field, MeMarked};
use crate::entities::member::member_entity::{MemberStatus, MemberType};
use crate::middleware::utils::db_utils::ViewFieldSelector;
use crate::utils::validate_utils::serialize_thing;

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberView {
    #[serde(serialize_with = "serialize_thing")]
    pub id: Thing,
    pub member_type: MemberType,
    pub member_status: MemberStatus,
    pub member_nick: String,
    pub member_phone: Option<String>,
    pub member_full_name: Option<String>,
    pub member_image: Option<String>,
    pub member_desc: Option<String>,
    pub member_jobs: i64,
    pub member_properties: i64,
    pub member_articles: i64,
    pub member_views: i64,
    pub member_marks: i64,
    pub member_comments: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub me_marked: Vec<MeMarked>,
}

impl ViewFieldSelector for MemberView {
    fn get_select_query_fields() -> String {
        format!(
            "id,
        member_type,
        member_status,
        member_nick,
        member_phone,
        member_full_name,
        member_image,
        member_desc,
        member_jobs,
        member_properties,
        member_articles,
        member_views,
        member_marks,
        member_comments,
        deleted_at,
        created_at,
        updated_at,
        {}",
            me_marked_query_field()
        )
    }
}

/// Owner summary embedded into listings as `member_data`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberDataView {
    #[serde(serialize_with = "serialize_thing")]
    pub id: Thing,
    pub member_nick: String,
    pub member_full_name: Option<String>,
    pub member_image: Option<String>,
    pub member_type: MemberType,
}

pub const MEMBER_DATA_FIELDS: &str =
    "member_id.{id, member_nick, member_full_name, member_image, member_type} AS member_data";

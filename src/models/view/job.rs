use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::entities::listing::job_entity::{
    JobCategory, JobExperience, JobStatus, JobTag, JobType, KoreanLevel, WorkplaceType,
};
use crate::entities::listing::Location;
use crate::entities::mark::{me_marked_query_field, MeMarked};
use crate::middleware::utils::db_utils::ViewFieldSelector;
use crate::models::view::member::{MemberDataView, MEMBER_DATA_FIELDS};
use crate::utils::validate_utils::serialize_thing;

#[derive(Debug, Serialize, Deserialize)]
pub struct JobView {
    #[serde(serialize_with = "serialize_thing")]
    pub id: Thing,
    pub job_type: JobType,
    pub job_status: JobStatus,
    pub job_location: Location,
    pub job_address: String,
    pub job_title: String,
    pub job_salary: i64,
    pub korean_level: KoreanLevel,
    pub workplace_type: WorkplaceType,
    pub job_category: JobCategory,
    pub job_images: Vec<String>,
    pub job_desc: Option<String>,
    pub job_visa: bool,
    pub job_tags: Vec<JobTag>,
    pub job_experience: JobExperience,
    #[serde(serialize_with = "serialize_thing")]
    pub member_id: Thing,
    pub job_views: i64,
    pub job_marks: i64,
    pub job_comments: i64,
    pub closed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_data: Option<MemberDataView>,
    #[serde(default)]
    pub me_marked: Vec<MeMarked>,
}

impl ViewFieldSelector for JobView {
    fn get_select_query_fields() -> String {
        format!(
            "id,
        job_type,
        job_status,
        job_location,
        job_address,
        job_title,
        job_salary,
        korean_level,
        workplace_type,
        job_category,
        job_images,
        job_desc,
        job_visa,
        job_tags,
        job_experience,
        member_id,
        job_views,
        job_marks,
        job_comments,
        closed_at,
        deleted_at,
        posted_at,
        created_at,
        updated_at,
        {MEMBER_DATA_FIELDS},
        {}",
            me_marked_query_field()
        )
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::{Datetime, Thing};
use tracing::error;

use super::{Location, LOCATION_VALUES};
use crate::database::client::Db;
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::utils::db_utils::{
    get_entity_view, get_listing, Listing, Pagination, QryConditions,
};
use crate::models::view::job::JobView;

pub const TABLE_NAME: &str = "job";

/// Fields a job listing may be sorted by.
pub const SORT_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "job_salary",
    "job_views",
    "job_marks",
    "job_comments",
];

/// Boolean fields usable as search options.
pub const OPTION_FIELDS: &[&str] = &["job_visa"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum JobType {
    Fulltime,
    Parttime,
    Contract,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum JobStatus {
    Hiring,
    Closed,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KoreanLevel {
    NotRequired,
    Basic,
    Conversational,
    Business,
    Fluent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkplaceType {
    Onsite,
    Hybrid,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobCategory {
    Engineering,
    Design,
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobExperience {
    EntryLevel,
    Junior,
    MidLevel,
    Senior,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobTag {
    Analytics,
    Android,
    Angular,
    Backend,
    Blockchain,
    C,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "C++")]
    CPlusPlus,
    Css,
    CustomerSupport,
    DataAnalysis,
    DataEngineering,
    DataManagement,
    Devops,
    Elixir,
    EmbeddedSystem,
    EngineeringManagement,
    Flutter,
    Frontend,
    FullStack,
    GameDevelopment,
    Go,
    GraphicDesign,
    Html,
    Infrastructure,
    Ios,
    Iot,
    Java,
    Javascript,
    Kotlin,
    MachineLearning,
    MechanicalEngineering,
    Network,
    NoSql,
    NodeJs,
    Php,
    ProjectManagement,
    Python,
    Qa,
    React,
    ReactNative,
    Typescript,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Job {
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
    pub member_id: Thing,
    pub job_views: i64,
    pub job_marks: i64,
    pub job_comments: i64,
    pub closed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateJob {
    pub job_type: JobType,
    pub job_location: Location,
    pub job_address: String,
    pub job_title: String,
    pub job_salary: i64,
    pub korean_level: KoreanLevel,
    pub workplace_type: WorkplaceType,
    pub job_category: JobCategory,
    pub job_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_desc: Option<String>,
    pub job_visa: bool,
    pub job_tags: Vec<JobTag>,
    pub job_experience: JobExperience,
    pub member_id: Thing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<Datetime>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateJobData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub korean_level: Option<KoreanLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workplace_type: Option<WorkplaceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_category: Option<JobCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_visa: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_tags: Option<Vec<JobTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_experience: Option<JobExperience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<Datetime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<Datetime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Datetime>,
}

pub struct JobDbService<'a> {
    pub db: &'a Db,
    pub ctx: &'a Ctx,
}

const INDEX_TYPE_LOCATION_TITLE: &str = "job_type_location_title_idx";

impl<'a> JobDbService<'a> {
    pub async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS job_type ON TABLE {TABLE_NAME} TYPE string ASSERT $value INSIDE ['FULLTIME', 'PARTTIME', 'CONTRACT', 'INTERNSHIP'];
    DEFINE FIELD IF NOT EXISTS job_status ON TABLE {TABLE_NAME} TYPE string DEFAULT 'HIRING' ASSERT $value INSIDE ['HIRING', 'CLOSED', 'DELETE'];
    DEFINE FIELD IF NOT EXISTS job_location ON TABLE {TABLE_NAME} TYPE string ASSERT $value INSIDE {LOCATION_VALUES};
    DEFINE FIELD IF NOT EXISTS job_address ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS job_title ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>0;
    DEFINE FIELD IF NOT EXISTS job_salary ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS korean_level ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS workplace_type ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS job_category ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS job_images ON TABLE {TABLE_NAME} TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS job_desc ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS job_visa ON TABLE {TABLE_NAME} TYPE bool DEFAULT false;
    DEFINE FIELD IF NOT EXISTS job_tags ON TABLE {TABLE_NAME} TYPE array<string> DEFAULT [];
    DEFINE FIELD IF NOT EXISTS job_experience ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS member_id ON TABLE {TABLE_NAME} TYPE record<{MEMBER_TABLE_NAME}>;
    DEFINE INDEX IF NOT EXISTS job_member_idx ON TABLE {TABLE_NAME} COLUMNS member_id;
    DEFINE FIELD IF NOT EXISTS job_views ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS job_marks ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS job_comments ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS closed_at ON TABLE {TABLE_NAME} TYPE option<datetime>;
    DEFINE FIELD IF NOT EXISTS deleted_at ON TABLE {TABLE_NAME} TYPE option<datetime>;
    DEFINE FIELD IF NOT EXISTS posted_at ON TABLE {TABLE_NAME} TYPE option<datetime>;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    DEFINE INDEX IF NOT EXISTS {INDEX_TYPE_LOCATION_TITLE} ON TABLE {TABLE_NAME} COLUMNS job_type, job_location, job_title UNIQUE;
    DEFINE INDEX IF NOT EXISTS job_status_idx ON TABLE {TABLE_NAME} COLUMNS job_status;
");
        let mutation = self.db.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    pub async fn create(&self, data: CreateJob) -> CtxResult<Job> {
        let res: Option<Job> = self
            .db
            .create(TABLE_NAME)
            .content(data)
            .await
            .map_err(|err| {
                error!("job create failed: {err}");
                self.ctx.to_ctx_error(AppError::CreateFailed)
            })?;
        res.ok_or_else(|| self.ctx.to_ctx_error(AppError::CreateFailed))
    }

    pub async fn get_with_status(&self, id: &Thing, status: JobStatus) -> CtxResult<Option<Job>> {
        let mut res = self
            .db
            .query("SELECT * FROM $id WHERE job_status=$status;")
            .bind(("id", id.clone()))
            .bind(("status", status))
            .await?;
        Ok(res.take::<Option<Job>>(0)?)
    }

    pub async fn get_view(&self, id: &Thing, viewer: Option<Thing>) -> CtxResult<Option<JobView>> {
        Ok(get_entity_view::<JobView>(self.db, id, viewer).await?)
    }

    /// Updates a HIRING job owned by `member`, `None` when nothing matched.
    pub async fn update_own_hiring(
        &self,
        id: &Thing,
        member: &Thing,
        data: UpdateJobData,
    ) -> CtxResult<Option<Job>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data WHERE member_id=$member AND job_status='HIRING' RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("member", member.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Job>>(0)?)
    }

    /// Updates the job regardless of owner or status.
    pub async fn update(&self, id: &Thing, data: UpdateJobData) -> CtxResult<Option<Job>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Job>>(0)?)
    }


    pub async fn get_list(
        &self,
        conditions: QryConditions,
        pagination: &Pagination,
        viewer: Option<Thing>,
    ) -> CtxResult<Listing<JobView>> {
        Ok(get_listing::<JobView>(self.db, TABLE_NAME, conditions, pagination, viewer).await?)
    }

    /// Deletes the record only when it is in DELETE status.
    pub async fn remove_deleted(&self, id: &Thing) -> CtxResult<Option<Job>> {
        let mut res = self
            .db
            .query("DELETE $id WHERE job_status='DELETE' RETURN BEFORE;")
            .bind(("id", id.clone()))
            .await?;
        Ok(res.take::<Option<Job>>(0)?)
    }
}

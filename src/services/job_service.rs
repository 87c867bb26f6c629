use chrono::Utc;
use serde::Deserialize;
use surrealdb::sql::Thing;
use tracing::info;
use validator::Validate;

use crate::{
    database::client::Db,
    entities::{
        listing::{
            job_entity::{
                CreateJob, Job, JobCategory, JobDbService, JobExperience, JobStatus, JobTag,
                JobType, KoreanLevel, UpdateJobData, WorkplaceType, OPTION_FIELDS, SORT_FIELDS,
                TABLE_NAME,
            },
            Location,
        },
        mark::MarkGroup,
        member::member_entity::{MemberDbService, MemberType, TABLE_NAME as MEMBER_TABLE_NAME},
        view::ViewGroup,
    },
    interfaces::repositories::{
        mark::MarksRepositoryInterface, view::ViewsRepositoryInterface,
    },
    middleware::{
        ctx::Ctx,
        error::{AppError, AppResult, CtxResult},
        utils::{
            db_utils::{Listing, QryConditions, QryOrder},
            string_utils::get_table_thing,
        },
    },
    models::{
        inquiry::{options_condition, sorted_pagination, NumberRange, OrdinaryInquiry},
        view::{job::JobView, RemovedView},
    },
    utils::validate_utils::{validate_images, validate_not_blank},
};

use super::{mark_service::MarkService, view_service::ViewService};

const MEMBER_JOBS: &str = "member_jobs";

#[derive(Debug, Deserialize, Validate)]
pub struct JobInput {
    pub job_type: JobType,
    pub job_location: Location,
    #[validate(custom(function = validate_not_blank))]
    pub job_address: String,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub job_title: String,
    #[validate(range(min = 0))]
    pub job_salary: i64,
    pub korean_level: KoreanLevel,
    pub workplace_type: WorkplaceType,
    pub job_category: JobCategory,
    #[validate(custom(function = validate_images))]
    pub job_images: Vec<String>,
    #[validate(length(max = 2000))]
    pub job_desc: Option<String>,
    #[serde(default)]
    pub job_visa: bool,
    #[serde(default)]
    pub job_tags: Vec<JobTag>,
    pub job_experience: JobExperience,
}

#[derive(Debug, Deserialize, Validate)]
pub struct JobUpdateInput {
    pub id: String,
    pub job_type: Option<JobType>,
    pub job_status: Option<JobStatus>,
    pub job_location: Option<Location>,
    #[validate(custom(function = validate_not_blank))]
    pub job_address: Option<String>,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub job_title: Option<String>,
    #[validate(range(min = 0))]
    pub job_salary: Option<i64>,
    pub korean_level: Option<KoreanLevel>,
    pub workplace_type: Option<WorkplaceType>,
    pub job_category: Option<JobCategory>,
    #[validate(custom(function = validate_images))]
    pub job_images: Option<Vec<String>>,
    #[validate(length(max = 2000))]
    pub job_desc: Option<String>,
    pub job_visa: Option<bool>,
    pub job_tags: Option<Vec<JobTag>>,
    pub job_experience: Option<JobExperience>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobSearch {
    pub member_id: Option<String>,
    pub location_list: Option<Vec<Location>>,
    pub type_list: Option<Vec<JobType>>,
    pub job_category: Option<JobCategory>,
    pub workplace_type: Option<WorkplaceType>,
    #[validate(nested)]
    pub salary_range: Option<NumberRange>,
    pub options: Option<Vec<String>>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct JobsInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    #[validate(nested)]
    pub search: JobSearch,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgentJobSearch {
    pub job_status: Option<JobStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AgentJobsInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: AgentJobSearch,
}

#[derive(Debug, Default, Deserialize)]
pub struct AllJobsSearch {
    pub job_status: Option<JobStatus>,
    pub location_list: Option<Vec<Location>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AllJobsInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: AllJobsSearch,
}

/// WHERE conditions of the public job search, HIRING jobs only.
pub fn job_search_conditions(search: JobSearch) -> AppResult<QryConditions> {
    let mut conditions = QryConditions::new();
    conditions.push("job_status = 'HIRING'");

    if let Some(member_id) = search.member_id {
        let member = get_table_thing(MEMBER_TABLE_NAME, &member_id)?;
        conditions.push_bound("member_id = <record>$member_id", "member_id", member.to_raw())?;
    }
    if let Some(locations) = search.location_list.filter(|l| !l.is_empty()) {
        conditions.push_bound("job_location IN $location_list", "location_list", locations)?;
    }
    if let Some(types) = search.type_list.filter(|t| !t.is_empty()) {
        conditions.push_bound("job_type IN $type_list", "type_list", types)?;
    }
    if let Some(category) = search.job_category {
        conditions.push_bound("job_category = $job_category", "job_category", category)?;
    }
    if let Some(workplace) = search.workplace_type {
        conditions.push_bound("workplace_type = $workplace_type", "workplace_type", workplace)?;
    }
    if let Some(range) = search.salary_range {
        conditions.push(range.condition("job_salary"));
    }
    if let Some(options) = options_condition(&search.options.unwrap_or_default(), OPTION_FIELDS)? {
        conditions.push(options);
    }
    if let Some(text) = search.text.filter(|t| !t.trim().is_empty()) {
        conditions.push_bound(
            "string::contains(string::lowercase(job_title), $text)",
            "text",
            text.trim().to_lowercase(),
        )?;
    }
    Ok(conditions)
}

pub struct JobService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    ctx: &'a Ctx,
    job_repository: JobDbService<'a>,
    member_repository: MemberDbService<'a>,
    mark_service: MarkService<'a, M>,
    view_service: ViewService<'a, V>,
}

impl<'a, M, V> JobService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    pub fn new(db: &'a Db, ctx: &'a Ctx, marks: &'a M, views: &'a V) -> Self {
        Self {
            ctx,
            job_repository: JobDbService { db, ctx },
            member_repository: MemberDbService { db, ctx },
            mark_service: MarkService::new(db, ctx, marks),
            view_service: ViewService::new(db, ctx, views),
        }
    }

    pub fn parse_id(&self, id: &str) -> CtxResult<Thing> {
        get_table_thing(TABLE_NAME, id).map_err(|e| self.ctx.to_ctx_error(e))
    }

    pub async fn create_job(&self, me: &Thing, input: JobInput) -> CtxResult<JobView> {
        input.validate()?;
        self.member_repository
            .must_be_active(me, &[MemberType::Company])
            .await?;

        let job = self
            .job_repository
            .create(CreateJob {
                job_type: input.job_type,
                job_location: input.job_location,
                job_address: input.job_address,
                job_title: input.job_title.trim().to_string(),
                job_salary: input.job_salary,
                korean_level: input.korean_level,
                workplace_type: input.workplace_type,
                job_category: input.job_category,
                job_images: input.job_images,
                job_desc: input.job_desc,
                job_visa: input.job_visa,
                job_tags: input.job_tags,
                job_experience: input.job_experience,
                member_id: me.clone(),
                posted_at: Some(Utc::now().into()),
            })
            .await?;

        self.member_repository
            .stats_editor(me, MEMBER_JOBS, 1)
            .await?;
        info!("job {} created by {me}", job.id);

        self.view_of(&job.id, Some(me.clone())).await
    }

    /// HIRING job, counting the viewer's first visit.
    pub async fn get_job(&self, viewer: Option<Thing>, id: &Thing) -> CtxResult<JobView> {
        self.job_repository
            .get_with_status(id, JobStatus::Hiring)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        if let Some(viewer) = viewer.as_ref() {
            self.view_service
                .record_view(viewer, id, ViewGroup::Job)
                .await?;
        }
        self.view_of(id, viewer).await
    }

    pub async fn update_job(&self, me: &Thing, input: JobUpdateInput) -> CtxResult<JobView> {
        input.validate()?;
        self.member_repository
            .must_be_active(me, &[MemberType::Company])
            .await?;

        let id = self.parse_id(&input.id)?;
        let status = input.job_status;
        let updated = self
            .job_repository
            .update_own_hiring(&id, me, update_data(input))
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        if matches!(status, Some(JobStatus::Closed | JobStatus::Delete)) {
            self.member_repository
                .stats_editor(&updated.member_id, MEMBER_JOBS, -1)
                .await?;
        }

        self.view_of(&id, Some(me.clone())).await
    }

    pub async fn get_jobs(
        &self,
        viewer: Option<Thing>,
        inquiry: JobsInquiry,
    ) -> CtxResult<Listing<JobView>> {
        inquiry.validate()?;
        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;
        let conditions = job_search_conditions(inquiry.search)?;
        self.job_repository
            .get_list(conditions, &pagination, viewer)
            .await
    }

    pub async fn get_agent_jobs(
        &self,
        me: &Thing,
        inquiry: AgentJobsInquiry,
    ) -> CtxResult<Listing<JobView>> {
        inquiry.validate()?;
        self.member_repository
            .must_be_active(me, &[MemberType::Company])
            .await?;

        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        conditions.push_bound("member_id = <record>$agent", "agent", me.to_raw())?;
        match inquiry.search.job_status {
            Some(JobStatus::Delete) => {
                return Err(self.ctx.to_ctx_error(AppError::NotAllowedRequest))
            }
            Some(status) => {
                conditions.push_bound("job_status = $job_status", "job_status", status)?;
            }
            None => {
                conditions.push("job_status != 'DELETE'");
            }
        }

        self.job_repository
            .get_list(conditions, &pagination, Some(me.clone()))
            .await
    }

    pub async fn mark_target_job(&self, me: &Thing, id: &Thing) -> CtxResult<JobView> {
        self.member_repository.must_be_active(me, &[]).await?;
        self.job_repository
            .get_with_status(id, JobStatus::Hiring)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        self.mark_service
            .toggle_target::<Job>(me, id, MarkGroup::Job)
            .await?;

        self.view_of(id, Some(me.clone())).await
    }

    pub async fn get_favorites(
        &self,
        me: &Thing,
        inquiry: OrdinaryInquiry,
    ) -> CtxResult<Listing<JobView>> {
        inquiry.validate()?;
        self.mark_service
            .get_favorites::<JobView>(me, MarkGroup::Job, &inquiry)
            .await
    }

    pub async fn get_visited(
        &self,
        me: &Thing,
        inquiry: OrdinaryInquiry,
    ) -> CtxResult<Listing<JobView>> {
        inquiry.validate()?;
        self.view_service
            .get_visited::<JobView>(me, ViewGroup::Job, &inquiry)
            .await
    }

    pub async fn get_all_jobs_by_admin(
        &self,
        admin: &Thing,
        inquiry: AllJobsInquiry,
    ) -> CtxResult<Listing<JobView>> {
        inquiry.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        if let Some(status) = inquiry.search.job_status {
            conditions.push_bound("job_status = $job_status", "job_status", status)?;
        }
        if let Some(locations) = inquiry.search.location_list.filter(|l| !l.is_empty()) {
            conditions.push_bound("job_location IN $location_list", "location_list", locations)?;
        }

        self.job_repository
            .get_list(conditions, &pagination, None)
            .await
    }

    /// Any status change. Leaving HIRING decrements the owner's job counter and
    /// returning to it increments the counter again.
    pub async fn update_job_by_admin(
        &self,
        admin: &Thing,
        input: JobUpdateInput,
    ) -> CtxResult<JobView> {
        input.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let id = self.parse_id(&input.id)?;
        let was_hiring = self
            .job_repository
            .get_with_status(&id, JobStatus::Hiring)
            .await?
            .is_some();

        let status = input.job_status;
        let updated = self
            .job_repository
            .update(&id, update_data(input))
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        let modifier = match (was_hiring, status) {
            (true, Some(JobStatus::Closed | JobStatus::Delete)) => -1,
            (false, Some(JobStatus::Hiring)) => 1,
            _ => 0,
        };
        if modifier != 0 {
            self.member_repository
                .stats_editor(&updated.member_id, MEMBER_JOBS, modifier)
                .await?;
        }

        self.view_of(&id, None).await
    }

    pub async fn remove_job_by_admin(&self, admin: &Thing, id: &Thing) -> CtxResult<RemovedView> {
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let removed = self
            .job_repository
            .remove_deleted(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::RemoveFailed))?;
        info!("job {} removed by admin {admin}", removed.id);
        Ok(RemovedView { id: removed.id })
    }

    async fn view_of(&self, id: &Thing, viewer: Option<Thing>) -> CtxResult<JobView> {
        self.job_repository
            .get_view(id, viewer)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))
    }
}

fn update_data(input: JobUpdateInput) -> UpdateJobData {
    let now = || Some(Utc::now().into());
    UpdateJobData {
        job_type: input.job_type,
        job_status: input.job_status,
        job_location: input.job_location,
        job_address: input.job_address,
        job_title: input.job_title.map(|t| t.trim().to_string()),
        job_salary: input.job_salary,
        korean_level: input.korean_level,
        workplace_type: input.workplace_type,
        job_category: input.job_category,
        job_images: input.job_images,
        job_desc: input.job_desc,
        job_visa: input.job_visa,
        job_tags: input.job_tags,
        job_experience: input.job_experience,
        posted_at: None,
        closed_at: match input.job_status {
            Some(JobStatus::Closed) => now(),
            _ => None,
        },
        deleted_at: match input.job_status {
            Some(JobStatus::Delete) => now(),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_always_limits_to_hiring() {
        let conditions = job_search_conditions(JobSearch::default()).unwrap();
        assert_eq!(conditions.to_where(), "WHERE job_status = 'HIRING'");
    }

    #[test]
    fn search_combines_filters() {
        let search = JobSearch {
            member_id: Some("abc".to_string()),
            salary_range: Some(NumberRange { start: 10, end: 20 }),
            options: Some(vec!["job_visa".to_string()]),
            text: Some(" Rust ".to_string()),
            ..Default::default()
        };
        let where_q = job_search_conditions(search).unwrap().to_where();
        assert!(where_q.contains("member_id = <record>$member_id"));
        assert!(where_q.contains("job_salary >= 10 AND job_salary <= 20"));
        assert!(where_q.contains("(job_visa = true)"));
        assert!(where_q.contains("string::contains(string::lowercase(job_title), $text)"));
    }

    #[test]
    fn search_rejects_unknown_option() {
        let search = JobSearch {
            options: Some(vec!["job_status".to_string()]),
            ..Default::default()
        };
        assert!(job_search_conditions(search).is_err());
    }

    #[test]
    fn closing_stamps_closed_at() {
        let input = JobUpdateInput {
            id: "job:1".to_string(),
            job_type: None,
            job_status: Some(JobStatus::Closed),
            job_location: None,
            job_address: None,
            job_title: None,
            job_salary: None,
            korean_level: None,
            workplace_type: None,
            job_category: None,
            job_images: None,
            job_desc: None,
            job_visa: None,
            job_tags: None,
            job_experience: None,
        };
        let data = update_data(input);
        assert!(data.closed_at.is_some());
        assert!(data.deleted_at.is_none());
    }
}

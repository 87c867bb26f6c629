use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::{
    middleware::{
        auth_with_login_access::AuthWithLoginAccess, ctx::Ctx, error::CtxResult,
        mw_ctx::CtxState, utils::db_utils::Listing,
    },
    models::{inquiry::OrdinaryInquiry, view::job::JobView},
    services::job_service::{AgentJobsInquiry, JobInput, JobService, JobUpdateInput, JobsInquiry},
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/jobs", post(create_job))
        .route("/api/jobs", patch(update_job))
        .route("/api/jobs/list", post(get_jobs))
        .route("/api/jobs/agent", post(get_agent_jobs))
        .route("/api/jobs/favorites", post(get_favorites))
        .route("/api/jobs/visited", post(get_visited))
        .route("/api/jobs/:id", get(get_job))
        .route("/api/jobs/:id/mark", post(mark_job))
}

async fn create_job(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<JobInput>,
) -> CtxResult<Json<JobView>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let job = service.create_job(&auth_data.member_id, body).await?;
    Ok(Json(job))
}

async fn get_job(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> CtxResult<Json<JobView>> {
    let service = JobService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let job = service.get_job(ctx.optional_member_thing(), &id).await?;
    Ok(Json(job))
}

async fn update_job(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<JobUpdateInput>,
) -> CtxResult<Json<JobView>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let job = service.update_job(&auth_data.member_id, body).await?;
    Ok(Json(job))
}

async fn get_jobs(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Json(body): Json<JobsInquiry>,
) -> CtxResult<Json<Listing<JobView>>> {
    let service = JobService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let jobs = service.get_jobs(ctx.optional_member_thing(), body).await?;
    Ok(Json(jobs))
}

async fn get_agent_jobs(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<AgentJobsInquiry>,
) -> CtxResult<Json<Listing<JobView>>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let jobs = service.get_agent_jobs(&auth_data.member_id, body).await?;
    Ok(Json(jobs))
}

async fn mark_job(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<JobView>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let job = service.mark_target_job(&auth_data.member_id, &id).await?;
    Ok(Json(job))
}

async fn get_favorites(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<OrdinaryInquiry>,
) -> CtxResult<Json<Listing<JobView>>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let jobs = service.get_favorites(&auth_data.member_id, body).await?;
    Ok(Json(jobs))
}

async fn get_visited(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<OrdinaryInquiry>,
) -> CtxResult<Json<Listing<JobView>>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let jobs = service.get_visited(&auth_data.member_id, body).await?;
    Ok(Json(jobs))
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, patch, post},
    Json, Router,
};

use crate::{
    middleware::{
        auth_with_login_access::AuthWithLoginAccess, error::CtxResult, mw_ctx::CtxState,
        utils::db_utils::Listing,
    },
    models::view::{
        board_article::BoardArticleView, job::JobView, member::MemberView,
        property::PropertyView, RemovedView,
    },
    services::{
        board_article_service::{
            AllBoardArticlesInquiry, BoardArticleService, BoardArticleUpdateInput,
        },
        comment_service::CommentService,
        job_service::{AllJobsInquiry, JobService, JobUpdateInput},
        member_service::{MemberService, MemberUpdateByAdminInput, MembersInquiry},
        property_service::{AllPropertiesInquiry, PropertyService, PropertyUpdateInput},
    },
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/admin/members/list", post(get_all_members))
        .route("/api/admin/members", patch(update_member))
        .route("/api/admin/jobs/list", post(get_all_jobs))
        .route("/api/admin/jobs", patch(update_job))
        .route("/api/admin/jobs/:id", delete(remove_job))
        .route("/api/admin/properties/list", post(get_all_properties))
        .route("/api/admin/properties", patch(update_property))
        .route("/api/admin/properties/:id", delete(remove_property))
        .route("/api/admin/articles/list", post(get_all_articles))
        .route("/api/admin/articles", patch(update_article))
        .route("/api/admin/articles/:id", delete(remove_article))
        .route("/api/admin/comments/:id", delete(remove_comment))
}

async fn get_all_members(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<MembersInquiry>,
) -> CtxResult<Json<Listing<MemberView>>> {
    let ctx = &auth_data.ctx;
    let service = MemberService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let members = service
        .get_all_members_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(members))
}

async fn update_member(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<MemberUpdateByAdminInput>,
) -> CtxResult<Json<MemberView>> {
    let ctx = &auth_data.ctx;
    let service = MemberService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let member = service
        .update_member_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(member))
}

async fn get_all_jobs(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<AllJobsInquiry>,
) -> CtxResult<Json<Listing<JobView>>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let jobs = service
        .get_all_jobs_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(jobs))
}

async fn update_job(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<JobUpdateInput>,
) -> CtxResult<Json<JobView>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let job = service
        .update_job_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(job))
}

async fn remove_job(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<RemovedView>> {
    let ctx = &auth_data.ctx;
    let service = JobService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let removed = service.remove_job_by_admin(&auth_data.member_id, &id).await?;
    Ok(Json(removed))
}

async fn get_all_properties(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<AllPropertiesInquiry>,
) -> CtxResult<Json<Listing<PropertyView>>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let properties = service
        .get_all_properties_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(properties))
}

async fn update_property(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<PropertyUpdateInput>,
) -> CtxResult<Json<PropertyView>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let property = service
        .update_property_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(property))
}

async fn remove_property(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<RemovedView>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let removed = service
        .remove_property_by_admin(&auth_data.member_id, &id)
        .await?;
    Ok(Json(removed))
}

async fn get_all_articles(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<AllBoardArticlesInquiry>,
) -> CtxResult<Json<Listing<BoardArticleView>>> {
    let ctx = &auth_data.ctx;
    let service =
        BoardArticleService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let articles = service
        .get_all_board_articles_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(articles))
}

async fn update_article(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<BoardArticleUpdateInput>,
) -> CtxResult<Json<BoardArticleView>> {
    let ctx = &auth_data.ctx;
    let service =
        BoardArticleService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let article = service
        .update_board_article_by_admin(&auth_data.member_id, body)
        .await?;
    Ok(Json(article))
}

async fn remove_article(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<RemovedView>> {
    let ctx = &auth_data.ctx;
    let service =
        BoardArticleService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let removed = service
        .remove_board_article_by_admin(&auth_data.member_id, &id)
        .await?;
    Ok(Json(removed))
}

async fn remove_comment(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<RemovedView>> {
    let service = CommentService::new(&state.db.client, &auth_data.ctx);
    let id = service.parse_id(&id)?;
    let removed = service
        .remove_comment_by_admin(&auth_data.member_id, &id)
        .await?;
    Ok(Json(removed))
}

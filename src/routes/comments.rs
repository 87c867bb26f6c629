use std::sync::Arc;

use axum::{
    extract::State,
    routing::{patch, post},
    Json, Router,
};

use crate::{
    middleware::{
        auth_with_login_access::AuthWithLoginAccess, ctx::Ctx, error::CtxResult,
        mw_ctx::CtxState, utils::db_utils::Listing,
    },
    models::view::comment::CommentView,
    services::comment_service::{
        CommentInput, CommentService, CommentUpdateInput, CommentsInquiry,
    },
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/comments", post(create_comment))
        .route("/api/comments", patch(update_comment))
        .route("/api/comments/list", post(get_comments))
}

async fn create_comment(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<CommentInput>,
) -> CtxResult<Json<CommentView>> {
    let service = CommentService::new(&state.db.client, &auth_data.ctx);
    let comment = service.create_comment(&auth_data.member_id, body).await?;
    Ok(Json(comment))
}

async fn update_comment(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<CommentUpdateInput>,
) -> CtxResult<Json<CommentView>> {
    let service = CommentService::new(&state.db.client, &auth_data.ctx);
    let comment = service.update_comment(&auth_data.member_id, body).await?;
    Ok(Json(comment))
}

async fn get_comments(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Json(body): Json<CommentsInquiry>,
) -> CtxResult<Json<Listing<CommentView>>> {
    let service = CommentService::new(&state.db.client, &ctx);
    let comments = service.get_comments(body).await?;
    Ok(Json(comments))
}

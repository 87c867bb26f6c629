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
    models::view::board_article::BoardArticleView,
    services::board_article_service::{
        BoardArticleInput, BoardArticleService, BoardArticleUpdateInput, BoardArticlesInquiry,
    },
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/articles", post(create_article))
        .route("/api/articles", patch(update_article))
        .route("/api/articles/list", post(get_articles))
        .route("/api/articles/:id", get(get_article))
        .route("/api/articles/:id/mark", post(mark_article))
}

async fn create_article(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<BoardArticleInput>,
) -> CtxResult<Json<BoardArticleView>> {
    let ctx = &auth_data.ctx;
    let service =
        BoardArticleService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let article = service
        .create_board_article(&auth_data.member_id, body)
        .await?;
    Ok(Json(article))
}

async fn get_article(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> CtxResult<Json<BoardArticleView>> {
    let service =
        BoardArticleService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let article = service
        .get_board_article(ctx.optional_member_thing(), &id)
        .await?;
    Ok(Json(article))
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
        .update_board_article(&auth_data.member_id, body)
        .await?;
    Ok(Json(article))
}

async fn get_articles(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Json(body): Json<BoardArticlesInquiry>,
) -> CtxResult<Json<Listing<BoardArticleView>>> {
    let service =
        BoardArticleService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let articles = service
        .get_board_articles(ctx.optional_member_thing(), body)
        .await?;
    Ok(Json(articles))
}

async fn mark_article(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<BoardArticleView>> {
    let ctx = &auth_data.ctx;
    let service =
        BoardArticleService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let article = service
        .mark_target_board_article(&auth_data.member_id, &id)
        .await?;
    Ok(Json(article))
}

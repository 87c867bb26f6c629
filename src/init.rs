use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    database::client::Database,
    entities::{
        community::{board_article_entity::BoardArticleDbService, comment_entity::CommentDbService},
        listing::{job_entity::JobDbService, property_entity::PropertyDbService},
        member::member_entity::MemberDbService,
    },
    middleware::{ctx::Ctx, error::AppResult, mw_ctx::CtxState},
    routes::{admin, articles, comments, jobs, members, properties},
    services::auth_service::AuthService,
};

pub async fn run_migrations(database: &Database) -> AppResult<()> {
    let db = database.client.clone();
    let c = Ctx::new(Ok("migrations".to_string()));

    MemberDbService { db: &db, ctx: &c }.mutate_db().await?;
    JobDbService { db: &db, ctx: &c }.mutate_db().await?;
    PropertyDbService { db: &db, ctx: &c }.mutate_db().await?;
    BoardArticleDbService { db: &db, ctx: &c }
        .mutate_db()
        .await?;
    CommentDbService { db: &db, ctx: &c }.mutate_db().await?;
    database.run_migrations().await?;
    Ok(())
}

/// Creates the configured ADMIN member if it does not exist yet.
pub async fn create_default_admin(ctx_state: &CtxState, config: &AppConfig) {
    let (Some(nick), Some(password)) = (&config.admin_nick, &config.admin_password) else {
        return;
    };
    let c = Ctx::new(Ok("create_default_admin".to_string()));
    let auth_service = AuthService::new(&ctx_state.db.client, &c, &ctx_state.jwt);

    match auth_service.create_default_admin(nick, password).await {
        Ok(()) => info!("default admin ready"),
        Err(err) => warn!("default admin not created: {}", err.error),
    }
}

pub fn main_router(ctx_state: &Arc<CtxState>) -> Router {
    Router::new()
        .route("/hc", get(get_hc))
        .merge(members::routes())
        .merge(jobs::routes())
        .merge(properties::routes())
        .merge(articles::routes())
        .merge(comments::routes())
        .merge(admin::routes())
        .with_state(ctx_state.clone())
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn get_hc() -> Response {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    (StatusCode::OK, format!("v{}", VERSION)).into_response()
}

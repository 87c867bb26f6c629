use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use tower_cookies::{Cookie, Cookies};

use crate::{
    middleware::{
        auth_with_login_access::AuthWithLoginAccess,
        ctx::Ctx,
        error::CtxResult,
        mw_ctx::{CtxState, JWT_KEY},
    },
    models::view::member::MemberView,
    services::{
        auth_service::{AuthService, AuthView, LoginInput, SignupInput},
        member_service::{MemberService, MemberUpdateInput},
    },
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/members/signup", post(signup))
        .route("/api/members/login", post(login))
        .route("/api/members", patch(update_member))
        .route("/api/members/:id", get(get_member))
        .route("/api/members/:id/mark", post(mark_member))
}

fn set_jwt_cookie(state: &CtxState, cookies: &Cookies, token: &str) {
    cookies.add(
        Cookie::build((JWT_KEY, token.to_string()))
            .path("/")
            .http_only(true)
            .secure(!state.is_development)
            .into(),
    );
}

async fn signup(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    cookies: Cookies,
    Json(body): Json<SignupInput>,
) -> CtxResult<Json<AuthView>> {
    let auth_service = AuthService::new(&state.db.client, &ctx, &state.jwt);
    let auth = auth_service.signup(body).await?;
    set_jwt_cookie(&state, &cookies, &auth.token);
    Ok(Json(auth))
}

async fn login(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    cookies: Cookies,
    Json(body): Json<LoginInput>,
) -> CtxResult<Json<AuthView>> {
    let auth_service = AuthService::new(&state.db.client, &ctx, &state.jwt);
    let auth = auth_service.login(body).await?;
    set_jwt_cookie(&state, &cookies, &auth.token);
    Ok(Json(auth))
}

async fn get_member(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> CtxResult<Json<MemberView>> {
    let service = MemberService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let member = service
        .get_member(ctx.optional_member_thing(), &id)
        .await?;
    Ok(Json(member))
}

async fn update_member(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<MemberUpdateInput>,
) -> CtxResult<Json<MemberView>> {
    let ctx = &auth_data.ctx;
    let service = MemberService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let member = service.update_member(&auth_data.member_id, body).await?;
    Ok(Json(member))
}

async fn mark_member(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<MemberView>> {
    let ctx = &auth_data.ctx;
    let service = MemberService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let member = service
        .mark_target_member(&auth_data.member_id, &id)
        .await?;
    Ok(Json(member))
}

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use surrealdb::sql::Thing;
use uuid::Uuid;

use super::error::{AppError, AppResult, CtxError};
use crate::middleware::mw_ctx::{CtxState, JWT_KEY};
use crate::middleware::utils::string_utils::get_str_thing;

/// Request context: the authenticated member (if any) and the request id.
#[derive(Clone, Debug)]
pub struct Ctx {
    result_member_id: AppResult<String>,
    req_id: Uuid,
}

impl Ctx {
    pub fn new(result_member_id: AppResult<String>) -> Self {
        Self {
            result_member_id,
            req_id: Uuid::new_v4(),
        }
    }

    /// Logged in member or `None` for anonymous requests.
    pub fn optional_member_thing(&self) -> Option<Thing> {
        self.result_member_id
            .as_ref()
            .ok()
            .and_then(|id| get_str_thing(id).ok())
    }

    pub fn to_ctx_error(&self, error: AppError) -> CtxError {
        CtxError {
            error,
            req_id: self.req_id,
        }
    }
}

pub(crate) fn read_token(parts: &Parts) -> Option<String> {
    if let Some(bearer) = parts.headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }
    CookieJar::from_headers(&parts.headers)
        .get(JWT_KEY)
        .map(|cookie| cookie.value().to_string())
}

#[async_trait]
impl FromRequestParts<Arc<CtxState>> for Ctx {
    type Rejection = CtxError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<CtxState>,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state): State<Arc<CtxState>> = State::from_request_parts(parts, state)
            .await
            .map_err(|_| CtxError::new(AppError::AuthFailCtxNotInRequestExt))?;

        let member_id = match read_token(parts) {
            Some(token) => app_state.jwt.decode(&token).map(|claims| claims.auth),
            None => Err(AppError::AuthFailNoJwtCookie),
        };

        Ok(Ctx::new(member_id))
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use surrealdb::sql::Thing;

use super::ctx::{read_token, Ctx};
use super::error::{AppError, CtxError};
use crate::middleware::mw_ctx::CtxState;
use crate::middleware::utils::string_utils::get_str_thing;

/// Rejects the request unless it carries a valid login token.
#[derive(Debug)]
pub struct AuthWithLoginAccess {
    pub member_id: Thing,
    pub ctx: Ctx,
}

#[async_trait]
impl FromRequestParts<Arc<CtxState>> for AuthWithLoginAccess {
    type Rejection = CtxError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<CtxState>,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state): State<Arc<CtxState>> = State::from_request_parts(parts, state)
            .await
            .map_err(|_| CtxError::new(AppError::AuthFailCtxNotInRequestExt))?;

        let token =
            read_token(parts).ok_or_else(|| CtxError::new(AppError::AuthFailNoJwtCookie))?;
        let claims = app_state.jwt.decode(&token).map_err(CtxError::new)?;
        let member_id = get_str_thing(&claims.auth).map_err(|_| {
            CtxError::new(AppError::AuthFailJwtInvalid {
                source: "token subject is not a record id".to_string(),
            })
        })?;

        Ok(AuthWithLoginAccess {
            member_id,
            ctx: Ctx::new(Ok(claims.auth)),
        })
    }
}

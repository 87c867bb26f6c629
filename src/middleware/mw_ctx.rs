use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use chrono::Duration;

use crate::config::AppConfig;
use crate::database::client::Database;
use crate::utils::jwt::JWT;

pub const JWT_KEY: &str = "jwt";

pub struct CtxState {
    pub db: Database,
    pub jwt: JWT,
    pub is_development: bool,
}

impl Debug for CtxState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CtxState")
            .field("is_development", &self.is_development)
            .finish_non_exhaustive()
    }
}

pub fn create_ctx_state(db: Database, config: &AppConfig) -> Arc<CtxState> {
    Arc::new(CtxState {
        db,
        jwt: JWT::new(
            config.jwt_secret.clone(),
            Duration::days(config.jwt_duration_days),
        ),
        is_development: config.is_development,
    })
}

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    database::client::Db,
    entities::member::member_entity::{
        CreateMember, MemberDbService, MemberStatus, MemberType,
    },
    middleware::{
        ctx::Ctx,
        error::{AppError, CtxResult},
    },
    models::view::member::MemberView,
    utils::{
        hash::{hash_password, verify_password},
        jwt::JWT,
        validate_utils::{trim_string, validate_member_nick, validate_phone_number},
    },
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SignupInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(custom(function = validate_member_nick))]
    pub member_nick: String,
    #[validate(length(min = 5, max = 32, message = "5 to 32 characters"))]
    pub member_password: String,
    pub member_type: Option<MemberType>,
    #[validate(custom(function = validate_phone_number))]
    pub member_phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginInput {
    #[serde(deserialize_with = "trim_string")]
    #[validate(custom(function = validate_member_nick))]
    pub member_nick: String,
    #[validate(length(min = 5, max = 32, message = "5 to 32 characters"))]
    pub member_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthView {
    pub token: String,
    pub member: MemberView,
}

pub struct AuthService<'a> {
    ctx: &'a Ctx,
    jwt: &'a JWT,
    member_repository: MemberDbService<'a>,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a Db, ctx: &'a Ctx, jwt: &'a JWT) -> AuthService<'a> {
        AuthService {
            ctx,
            jwt,
            member_repository: MemberDbService { db, ctx },
        }
    }

    pub async fn signup(&self, input: SignupInput) -> CtxResult<AuthView> {
        input.validate()?;

        let member_type = input.member_type.unwrap_or(MemberType::User);
        if member_type == MemberType::Admin {
            return Err(self.ctx.to_ctx_error(AppError::NotAllowedRequest));
        }

        self.register(
            input.member_nick,
            input.member_password,
            member_type,
            input.member_phone,
        )
        .await
    }

    pub async fn login(&self, input: LoginInput) -> CtxResult<AuthView> {
        input.validate()?;

        let nick = input.member_nick.to_lowercase();
        let member = self
            .member_repository
            .get_by_nick(&nick)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        if member.member_status != MemberStatus::Active {
            return Err(self.ctx.to_ctx_error(AppError::Blocked));
        }

        if !verify_password(&member.member_password, &input.member_password) {
            return Err(self.ctx.to_ctx_error(AppError::AuthenticationFail));
        }

        self.build_auth_view(&member.id).await
    }

    /// Creates the ADMIN account once, skipped when the nick is taken.
    pub async fn create_default_admin(&self, nick: &str, password: &str) -> CtxResult<()> {
        let nick = nick.trim().to_lowercase();
        if self.member_repository.get_by_nick(&nick).await?.is_some() {
            info!("default admin {nick} exists");
            return Ok(());
        }
        self.register(nick, password.to_string(), MemberType::Admin, None)
            .await?;
        info!("default admin created");
        Ok(())
    }

    async fn register(
        &self,
        nick: String,
        password: String,
        member_type: MemberType,
        phone: Option<String>,
    ) -> CtxResult<AuthView> {
        let member_password = hash_password(&password).map_err(|e| {
            warn!("password hash failed: {e}");
            self.ctx.to_ctx_error(AppError::SomethingWentWrong)
        })?;

        let member = self
            .member_repository
            .create(CreateMember {
                member_type,
                member_nick: nick.to_lowercase(),
                member_password,
                member_phone: phone,
            })
            .await?;

        self.build_auth_view(&member.id).await
    }

    async fn build_auth_view(&self, id: &surrealdb::sql::Thing) -> CtxResult<AuthView> {
        let token = self
            .jwt
            .create_by_login(&id.to_raw())
            .map_err(|e| self.ctx.to_ctx_error(e))?;

        let member = self
            .member_repository
            .get_view(id, None)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        Ok(AuthView { token, member })
    }
}

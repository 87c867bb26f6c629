use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

use crate::{
    database::client::Db,
    entities::{
        mark::MarkGroup,
        member::member_entity::{
            Member, MemberDbService, MemberStatus, MemberType, UpdateMemberData, SORT_FIELDS,
            TABLE_NAME,
        },
        view::ViewGroup,
    },
    interfaces::repositories::{
        mark::MarksRepositoryInterface, view::ViewsRepositoryInterface,
    },
    middleware::{
        ctx::Ctx,
        error::{AppError, CtxResult},
        utils::{
            db_utils::{Listing, QryConditions, QryOrder},
            string_utils::get_table_thing,
        },
    },
    models::{inquiry::sorted_pagination, view::member::MemberView},
    utils::validate_utils::{validate_not_blank, validate_phone_number},
};

use super::{mark_service::MarkService, view_service::ViewService};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct MemberUpdateInput {
    #[validate(custom(function = validate_not_blank))]
    pub member_full_name: Option<String>,
    #[validate(custom(function = validate_phone_number))]
    pub member_phone: Option<String>,
    #[validate(custom(function = validate_not_blank))]
    pub member_image: Option<String>,
    #[validate(length(max = 500, message = "Max 500 characters"))]
    pub member_desc: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MembersSearch {
    pub member_status: Option<MemberStatus>,
    pub member_type: Option<MemberType>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MembersInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: MembersSearch,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MemberUpdateByAdminInput {
    pub id: String,
    pub member_status: Option<MemberStatus>,
    pub member_type: Option<MemberType>,
    #[validate(custom(function = validate_not_blank))]
    pub member_full_name: Option<String>,
    #[validate(custom(function = validate_phone_number))]
    pub member_phone: Option<String>,
}

pub struct MemberService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    ctx: &'a Ctx,
    member_repository: MemberDbService<'a>,
    mark_service: MarkService<'a, M>,
    view_service: ViewService<'a, V>,
}

impl<'a, M, V> MemberService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    pub fn new(db: &'a Db, ctx: &'a Ctx, marks: &'a M, views: &'a V) -> Self {
        Self {
            ctx,
            member_repository: MemberDbService { db, ctx },
            mark_service: MarkService::new(db, ctx, marks),
            view_service: ViewService::new(db, ctx, views),
        }
    }

    pub fn parse_id(&self, id: &str) -> CtxResult<Thing> {
        get_table_thing(TABLE_NAME, id).map_err(|e| self.ctx.to_ctx_error(e))
    }

    /// ACTIVE member profile. A visit by another member is counted once.
    pub async fn get_member(&self, viewer: Option<Thing>, id: &Thing) -> CtxResult<MemberView> {
        let mut member = self
            .member_repository
            .get_active_view(id, viewer.clone())
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        if let Some(viewer) = viewer.filter(|v| v != id) {
            if self
                .view_service
                .record_view(&viewer, id, ViewGroup::Member)
                .await?
            {
                member.member_views += 1;
            }
        }
        Ok(member)
    }

    pub async fn update_member(&self, me: &Thing, input: MemberUpdateInput) -> CtxResult<MemberView> {
        input.validate()?;
        self.member_repository.must_be_active(me, &[]).await?;

        let data = UpdateMemberData {
            member_full_name: input.member_full_name,
            member_phone: input.member_phone,
            member_image: input.member_image,
            member_desc: input.member_desc,
            ..Default::default()
        };
        self.member_repository
            .update_active(me, data)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        self.view_of(me, Some(me.clone())).await
    }

    pub async fn mark_target_member(&self, me: &Thing, id: &Thing) -> CtxResult<MemberView> {
        self.member_repository.must_be_active(me, &[]).await?;

        let target = self
            .member_repository
            .get(id)
            .await?
            .filter(|m| m.member_status == MemberStatus::Active)
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        self.mark_service
            .toggle_target::<Member>(me, &target.id, MarkGroup::Member)
            .await?;

        self.view_of(&target.id, Some(me.clone())).await
    }

    pub async fn member_stats_editor(
        &self,
        id: &Thing,
        target_key: &'static str,
        modifier: i64,
    ) -> CtxResult<Member> {
        self.member_repository
            .stats_editor(id, target_key, modifier)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))
    }

    pub async fn get_all_members_by_admin(
        &self,
        admin: &Thing,
        inquiry: MembersInquiry,
    ) -> CtxResult<Listing<MemberView>> {
        inquiry.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        if let Some(status) = inquiry.search.member_status {
            conditions.push_bound("member_status = $member_status", "member_status", status)?;
        }
        if let Some(member_type) = inquiry.search.member_type {
            conditions.push_bound("member_type = $member_type", "member_type", member_type)?;
        }
        if let Some(text) = inquiry.search.text.filter(|t| !t.trim().is_empty()) {
            conditions.push_bound(
                "string::contains(member_nick, $text)",
                "text",
                text.trim().to_lowercase(),
            )?;
        }

        self.member_repository.get_list(conditions, &pagination).await
    }

    pub async fn update_member_by_admin(
        &self,
        admin: &Thing,
        input: MemberUpdateByAdminInput,
    ) -> CtxResult<MemberView> {
        input.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let id = self.parse_id(&input.id)?;
        let data = UpdateMemberData {
            member_status: input.member_status,
            member_type: input.member_type,
            member_full_name: input.member_full_name,
            member_phone: input.member_phone,
            deleted_at: match input.member_status {
                Some(MemberStatus::Delete) => Some(Utc::now().into()),
                _ => None,
            },
            ..Default::default()
        };

        self.member_repository
            .update(&id, data)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        self.view_of(&id, None).await
    }

    async fn view_of(&self, id: &Thing, viewer: Option<Thing>) -> CtxResult<MemberView> {
        self.member_repository
            .get_view(id, viewer)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))
    }
}

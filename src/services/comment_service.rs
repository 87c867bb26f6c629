use serde::Deserialize;
use surrealdb::sql::Thing;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    database::client::Db,
    entities::{
        community::comment_entity::{
            CommentDbService, CommentGroup, CommentStatus, CreateComment, UpdateCommentData,
            SORT_FIELDS, TABLE_NAME,
        },
        member::member_entity::{MemberDbService, MemberType},
    },
    middleware::{
        ctx::Ctx,
        error::{AppError, CtxResult},
        utils::{
            db_utils::{stats_editor, Listing, QryConditions, QryOrder, RecordWithId, StatisticModifier},
            string_utils::{get_str_thing, get_table_thing},
        },
    },
    models::{
        inquiry::sorted_pagination,
        view::{comment::CommentView, RemovedView},
    },
    utils::validate_utils::validate_not_blank,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CommentInput {
    pub comment_group: CommentGroup,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub comment_content: String,
    pub comment_ref_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentUpdateInput {
    pub id: String,
    pub comment_status: Option<CommentStatus>,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub comment_content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentSearch {
    pub comment_ref_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CommentsInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    pub search: CommentSearch,
}

pub struct CommentService<'a> {
    db: &'a Db,
    ctx: &'a Ctx,
    comment_repository: CommentDbService<'a>,
    member_repository: MemberDbService<'a>,
}

impl<'a> CommentService<'a> {
    pub fn new(db: &'a Db, ctx: &'a Ctx) -> Self {
        Self {
            db,
            ctx,
            comment_repository: CommentDbService { db, ctx },
            member_repository: MemberDbService { db, ctx },
        }
    }

    pub fn parse_id(&self, id: &str) -> CtxResult<Thing> {
        get_table_thing(TABLE_NAME, id).map_err(|e| self.ctx.to_ctx_error(e))
    }

    pub async fn create_comment(&self, me: &Thing, input: CommentInput) -> CtxResult<CommentView> {
        input.validate()?;
        self.member_repository.must_be_active(me, &[]).await?;

        let group = input.comment_group;
        let ref_id = get_table_thing(group.table_name(), &input.comment_ref_id)
            .map_err(|e| self.ctx.to_ctx_error(e))?;
        if !self.comment_repository.target_is_open(group, &ref_id).await? {
            return Err(self.ctx.to_ctx_error(AppError::NoDataFound));
        }

        let comment = self
            .comment_repository
            .create(CreateComment {
                comment_group: group,
                comment_content: input.comment_content.trim().to_string(),
                comment_ref_id: ref_id.clone(),
                member_id: me.clone(),
            })
            .await?;

        self.edit_target_counter(&ref_id, group, 1).await?;

        self.view_of(&comment.id).await
    }

    /// Edits own ACTIVE comment. Switching it to DELETE decrements the target counter.
    pub async fn update_comment(
        &self,
        me: &Thing,
        input: CommentUpdateInput,
    ) -> CtxResult<CommentView> {
        input.validate()?;
        self.member_repository.must_be_active(me, &[]).await?;

        let id = self.parse_id(&input.id)?;
        let data = UpdateCommentData {
            comment_status: input.comment_status,
            comment_content: input.comment_content.map(|c| c.trim().to_string()),
        };
        let updated = self
            .comment_repository
            .update_own_active(&id, me, data)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        if updated.comment_status == CommentStatus::Delete {
            self.edit_target_counter(&updated.comment_ref_id, updated.comment_group, -1)
                .await?;
        }

        self.view_of(&id).await
    }

    pub async fn get_comments(&self, inquiry: CommentsInquiry) -> CtxResult<Listing<CommentView>> {
        inquiry.validate()?;
        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let ref_id = get_str_thing(inquiry.search.comment_ref_id.trim())
            .map_err(|e| self.ctx.to_ctx_error(e))?;

        let mut conditions = QryConditions::new();
        conditions.push("comment_status = 'ACTIVE'");
        conditions.push_bound(
            "comment_ref_id = <record>$comment_ref_id",
            "comment_ref_id",
            ref_id.to_raw(),
        )?;

        self.comment_repository
            .get_list(conditions, &pagination)
            .await
    }

    pub async fn remove_comment_by_admin(
        &self,
        admin: &Thing,
        id: &Thing,
    ) -> CtxResult<RemovedView> {
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let removed = self
            .comment_repository
            .remove(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::RemoveFailed))?;

        if removed.comment_status == CommentStatus::Active {
            self.edit_target_counter(&removed.comment_ref_id, removed.comment_group, -1)
                .await?;
        }
        info!("comment {} removed by admin {admin}", removed.id);
        Ok(RemovedView { id: removed.id })
    }

    async fn edit_target_counter(
        &self,
        target: &Thing,
        group: CommentGroup,
        modifier: i64,
    ) -> CtxResult<()> {
        let updated = stats_editor::<RecordWithId>(
            self.db,
            StatisticModifier {
                id: target.clone(),
                target_key: group.counter_field(),
                modifier,
            },
        )
        .await
        .map_err(|e| self.ctx.to_ctx_error(e))?;

        if updated.is_none() {
            warn!("comment counter target {target} is gone");
        }
        Ok(())
    }

    async fn view_of(&self, id: &Thing) -> CtxResult<CommentView> {
        self.comment_repository
            .get_view(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))
    }
}

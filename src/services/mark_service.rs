use serde::de::DeserializeOwned;
use surrealdb::sql::Thing;
use tracing::{error, info};

use crate::{
    database::client::Db,
    entities::mark::{MarkGroup, MarkModifier, MeMarked},
    interfaces::repositories::mark::MarksRepositoryInterface,
    middleware::{
        ctx::Ctx,
        error::{AppError, CtxResult},
        utils::db_utils::{
            get_entities_view, stats_editor, Listing, StatisticModifier, TotalCounter,
            ViewFieldSelector,
        },
    },
    models::inquiry::OrdinaryInquiry,
};

pub struct MarkService<'a, M>
where
    M: MarksRepositoryInterface,
{
    db: &'a Db,
    ctx: &'a Ctx,
    marks_repository: &'a M,
}

impl<'a, M> MarkService<'a, M>
where
    M: MarksRepositoryInterface,
{
    pub fn new(db: &'a Db, ctx: &'a Ctx, marks_repository: &'a M) -> Self {
        Self {
            db,
            ctx,
            marks_repository,
        }
    }

    pub async fn toggle_mark(
        &self,
        member: &Thing,
        target: &Thing,
        group: MarkGroup,
    ) -> CtxResult<MarkModifier> {
        self.marks_repository
            .toggle(member.clone(), target.clone(), group)
            .await
            .map_err(|e| self.ctx.to_ctx_error(e))
    }

    /// Flips the member's mark on `target` and applies the sign to the target's
    /// marks counter. The two writes are separate statements, a failure in between
    /// leaves the counter off by one.
    pub async fn toggle_target<T: DeserializeOwned>(
        &self,
        member: &Thing,
        target: &Thing,
        group: MarkGroup,
    ) -> CtxResult<T> {
        let modifier = self.toggle_mark(member, target, group).await?;

        let updated = stats_editor::<T>(
            self.db,
            StatisticModifier {
                id: target.clone(),
                target_key: group.counter_field(),
                modifier: modifier.value(),
            },
        )
        .await
        .map_err(|e| self.ctx.to_ctx_error(e))?;

        match updated {
            Some(record) => {
                info!("- Mark modifier {} on {target} -", modifier.value());
                Ok(record)
            }
            None => {
                error!("mark counter target {target} is gone");
                Err(self.ctx.to_ctx_error(AppError::SomethingWentWrong))
            }
        }
    }

    pub async fn check_mark_existence(
        &self,
        member: &Thing,
        target: &Thing,
    ) -> CtxResult<Vec<MeMarked>> {
        let exists = self
            .marks_repository
            .exists(member.clone(), target.clone())
            .await
            .map_err(|e| self.ctx.to_ctx_error(e))?;

        Ok(match exists {
            true => vec![MeMarked {
                member_id: member.clone(),
                mark_ref_id: target.clone(),
                my_favorite: true,
            }],
            false => vec![],
        })
    }

    /// Targets of one group the member has marked, newest mark first.
    pub async fn get_favorites<T: DeserializeOwned + ViewFieldSelector>(
        &self,
        member: &Thing,
        group: MarkGroup,
        inquiry: &OrdinaryInquiry,
    ) -> CtxResult<Listing<T>> {
        let pagination = inquiry.pagination()?;
        let (ids, total) = self
            .marks_repository
            .get_marked(member.clone(), group, pagination.start(), pagination.limit)
            .await
            .map_err(|e| self.ctx.to_ctx_error(e))?;

        let list = get_entities_view::<T>(self.db, ids, Some(member.clone()))
            .await
            .map_err(|e| self.ctx.to_ctx_error(e))?;

        Ok(Listing {
            list,
            meta_counter: match total {
                0 => vec![],
                total => vec![TotalCounter { total }],
            },
        })
    }
}

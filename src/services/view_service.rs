use serde::de::DeserializeOwned;
use surrealdb::sql::Thing;

use crate::{
    database::client::Db,
    entities::view::ViewGroup,
    interfaces::repositories::view::ViewsRepositoryInterface,
    middleware::{
        ctx::Ctx,
        error::CtxResult,
        utils::db_utils::{
            get_entities_view, stats_editor, Listing, RecordWithId, StatisticModifier,
            TotalCounter, ViewFieldSelector,
        },
    },
    models::inquiry::OrdinaryInquiry,
};

pub struct ViewService<'a, V>
where
    V: ViewsRepositoryInterface,
{
    db: &'a Db,
    ctx: &'a Ctx,
    views_repository: &'a V,
}

impl<'a, V> ViewService<'a, V>
where
    V: ViewsRepositoryInterface,
{
    pub fn new(db: &'a Db, ctx: &'a Ctx, views_repository: &'a V) -> Self {
        Self {
            db,
            ctx,
            views_repository,
        }
    }

    /// Records the view and bumps the target's views counter on the first visit.
    pub async fn record_view(
        &self,
        member: &Thing,
        target: &Thing,
        group: ViewGroup,
    ) -> CtxResult<bool> {
        let new_view = self
            .views_repository
            .record_view(member.clone(), target.clone(), group)
            .await
            .map_err(|e| self.ctx.to_ctx_error(e))?;

        if new_view {
            stats_editor::<RecordWithId>(
                self.db,
                StatisticModifier {
                    id: target.clone(),
                    target_key: group.counter_field(),
                    modifier: 1,
                },
            )
            .await
            .map_err(|e| self.ctx.to_ctx_error(e))?;
        }
        Ok(new_view)
    }

    pub async fn get_visited<T: DeserializeOwned + ViewFieldSelector>(
        &self,
        member: &Thing,
        group: ViewGroup,
        inquiry: &OrdinaryInquiry,
    ) -> CtxResult<Listing<T>> {
        let pagination = inquiry.pagination()?;
        let (ids, total) = self
            .views_repository
            .get_visited(member.clone(), group, pagination.start(), pagination.limit)
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

use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::view::ViewGroup;
use crate::middleware::error::AppResult;

#[async_trait]
pub trait ViewsRepositoryInterface {
    /// Returns `true` only the first time the member views the target.
    async fn record_view(&self, member: Thing, target: Thing, group: ViewGroup) -> AppResult<bool>;
    async fn get_visited(
        &self,
        member: Thing,
        group: ViewGroup,
        start: u32,
        limit: u32,
    ) -> AppResult<(Vec<Thing>, i64)>;
}

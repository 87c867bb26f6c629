use async_trait::async_trait;
use surrealdb::sql::Thing;

use crate::entities::mark::{MarkGroup, MarkModifier};
use crate::middleware::error::AppResult;

#[async_trait]
pub trait MarksRepositoryInterface {
    /// Deletes the member's mark on `target` when present, creates it otherwise.
    async fn toggle(&self, member: Thing, target: Thing, group: MarkGroup)
        -> AppResult<MarkModifier>;
    async fn exists(&self, member: Thing, target: Thing) -> AppResult<bool>;
    async fn count_by_target(&self, target: Thing) -> AppResult<i64>;
    /// Marked targets of one group, newest mark first, with the total count.
    async fn get_marked(
        &self,
        member: Thing,
        group: MarkGroup,
        start: u32,
        limit: u32,
    ) -> AppResult<(Vec<Thing>, i64)>;
}

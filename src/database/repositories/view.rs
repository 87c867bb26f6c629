use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::sql::Thing;
use tracing::warn;

use crate::database::client::Db;
use crate::database::table_names::VIEW_TABLE_NAME;
use crate::entities::community::board_article_entity::TABLE_NAME as ARTICLE_TABLE_NAME;
use crate::entities::listing::job_entity::TABLE_NAME as JOB_TABLE_NAME;
use crate::entities::listing::property_entity::TABLE_NAME as PROPERTY_TABLE_NAME;
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::entities::view::ViewGroup;
use crate::interfaces::repositories::view::ViewsRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::utils::db_utils::{RecordWithId, TotalCounter};

#[derive(Debug)]
pub struct ViewsRepository {
    client: Arc<Db>,
}

impl ViewsRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {VIEW_TABLE_NAME} TYPE RELATION IN {MEMBER_TABLE_NAME} OUT {MEMBER_TABLE_NAME}|{JOB_TABLE_NAME}|{PROPERTY_TABLE_NAME}|{ARTICLE_TABLE_NAME} ENFORCED SCHEMAFULL PERMISSIONS NONE;
    DEFINE INDEX IF NOT EXISTS in_out_unique_idx ON {VIEW_TABLE_NAME} FIELDS in, out UNIQUE;
    DEFINE FIELD IF NOT EXISTS view_group ON TABLE {VIEW_TABLE_NAME} TYPE string ASSERT $value INSIDE ['MEMBER', 'JOB', 'PROPERTY', 'ARTICLE'];
    DEFINE INDEX IF NOT EXISTS in_group_idx ON {VIEW_TABLE_NAME} FIELDS in, view_group;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {VIEW_TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }
}

#[async_trait]
impl ViewsRepositoryInterface for ViewsRepository {
    async fn record_view(&self, member: Thing, target: Thing, group: ViewGroup) -> AppResult<bool> {
        let mut res = self
            .client
            .query(format!(
                "SELECT id FROM {VIEW_TABLE_NAME} WHERE in=$in AND out=$out LIMIT 1;"
            ))
            .bind(("in", member.clone()))
            .bind(("out", target.clone()))
            .await?;
        if res.take::<Option<RecordWithId>>(0)?.is_some() {
            return Ok(false);
        }

        let res = self
            .client
            .query(format!(
                "RELATE $in->{VIEW_TABLE_NAME}->$out SET view_group=$group;"
            ))
            .bind(("in", member.clone()))
            .bind(("out", target.clone()))
            .bind(("group", group))
            .await
            .and_then(|res| res.check());

        match res {
            Ok(_) => Ok(true),
            Err(err) => {
                // unique index keeps concurrent first views to one row
                warn!("view of {} by {} not recorded: {err}", target, member);
                Ok(false)
            }
        }
    }

    async fn get_visited(
        &self,
        member: Thing,
        group: ViewGroup,
        start: u32,
        limit: u32,
    ) -> AppResult<(Vec<Thing>, i64)> {
        let mut res = self
            .client
            .query(format!(
                "RETURN (SELECT out, created_at FROM {VIEW_TABLE_NAME}
                    WHERE in=$in AND view_group=$group
                    ORDER BY created_at DESC LIMIT $limit START $start).out;
                SELECT count() AS total FROM {VIEW_TABLE_NAME} WHERE in=$in AND view_group=$group GROUP ALL;"
            ))
            .bind(("in", member))
            .bind(("group", group))
            .bind(("limit", limit))
            .bind(("start", start))
            .await?;

        let ids = res.take::<Vec<Thing>>(0)?;
        let total = res.take::<Option<TotalCounter>>(1)?;
        Ok((ids, total.map(|t| t.total).unwrap_or(0)))
    }
}

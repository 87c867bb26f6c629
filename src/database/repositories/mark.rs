use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::sql::Thing;
use tracing::{debug, error, warn};

use crate::database::client::Db;
use crate::database::table_names::MARK_TABLE_NAME;
use crate::entities::community::board_article_entity::TABLE_NAME as ARTICLE_TABLE_NAME;
use crate::entities::listing::job_entity::TABLE_NAME as JOB_TABLE_NAME;
use crate::entities::listing::property_entity::TABLE_NAME as PROPERTY_TABLE_NAME;
use crate::entities::mark::{MarkGroup, MarkModifier};
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::interfaces::repositories::mark::MarksRepositoryInterface;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::utils::db_utils::{RecordWithId, TotalCounter};

#[derive(Debug)]
pub struct MarksRepository {
    client: Arc<Db>,
}

impl MarksRepository {
    pub fn new(client: Arc<Db>) -> Self {
        Self { client }
    }

    pub(in crate::database) async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {MARK_TABLE_NAME} TYPE RELATION IN {MEMBER_TABLE_NAME} OUT {MEMBER_TABLE_NAME}|{JOB_TABLE_NAME}|{PROPERTY_TABLE_NAME}|{ARTICLE_TABLE_NAME} ENFORCED SCHEMAFULL PERMISSIONS NONE;
    DEFINE INDEX IF NOT EXISTS in_out_unique_idx ON {MARK_TABLE_NAME} FIELDS in, out UNIQUE;
    DEFINE FIELD IF NOT EXISTS mark_group ON TABLE {MARK_TABLE_NAME} TYPE string ASSERT $value INSIDE ['MEMBER', 'JOB', 'PROPERTY', 'ARTICLE'];
    DEFINE INDEX IF NOT EXISTS in_group_idx ON {MARK_TABLE_NAME} FIELDS in, mark_group;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {MARK_TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {MARK_TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    ");
        let mutation = self.client.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    async fn find_id(&self, member: &Thing, target: &Thing) -> AppResult<Option<Thing>> {
        let mut res = self
            .client
            .query(format!(
                "SELECT id FROM {MARK_TABLE_NAME} WHERE in=$in AND out=$out LIMIT 1;"
            ))
            .bind(("in", member.clone()))
            .bind(("out", target.clone()))
            .await?;
        let rec = res.take::<Option<RecordWithId>>(0)?;
        Ok(rec.map(|r| r.id))
    }
}

#[async_trait]
impl MarksRepositoryInterface for MarksRepository {
    async fn toggle(
        &self,
        member: Thing,
        target: Thing,
        group: MarkGroup,
    ) -> AppResult<MarkModifier> {
        let modifier = match self.find_id(&member, &target).await? {
            Some(id) => {
                self.client
                    .query("DELETE $id;")
                    .bind(("id", id))
                    .await?
                    .check()?;
                MarkModifier::Unmark
            }
            None => {
                let res = self
                    .client
                    .query(format!(
                        "RELATE $in->{MARK_TABLE_NAME}->$out SET mark_group=$group;"
                    ))
                    .bind(("in", member.clone()))
                    .bind(("out", target.clone()))
                    .bind(("group", group))
                    .await
                    .and_then(|res| res.check());

                if let Err(err) = res {
                    // a concurrent toggle inserted the same pair first
                    if self.find_id(&member, &target).await?.is_none() {
                        error!("mark insert failed for {} -> {}: {err}", member, target);
                        return Err(AppError::CreateFailed);
                    }
                    warn!("mark for {} -> {} already inserted", member, target);
                }
                MarkModifier::Mark
            }
        };

        debug!("mark modifier {} on {}", modifier.value(), target);
        Ok(modifier)
    }

    async fn exists(&self, member: Thing, target: Thing) -> AppResult<bool> {
        Ok(self.find_id(&member, &target).await?.is_some())
    }

    async fn count_by_target(&self, target: Thing) -> AppResult<i64> {
        let mut res = self
            .client
            .query(format!(
                "SELECT count() AS total FROM {MARK_TABLE_NAME} WHERE out=$out GROUP ALL;"
            ))
            .bind(("out", target))
            .await?;
        let total = res.take::<Option<TotalCounter>>(0)?;
        Ok(total.map(|t| t.total).unwrap_or(0))
    }

    async fn get_marked(
        &self,
        member: Thing,
        group: MarkGroup,
        start: u32,
        limit: u32,
    ) -> AppResult<(Vec<Thing>, i64)> {
        let mut res = self
            .client
            .query(format!(
                "RETURN (SELECT out, created_at FROM {MARK_TABLE_NAME}
                    WHERE in=$in AND mark_group=$group
                    ORDER BY created_at DESC LIMIT $limit START $start).out;
                SELECT count() AS total FROM {MARK_TABLE_NAME} WHERE in=$in AND mark_group=$group GROUP ALL;"
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

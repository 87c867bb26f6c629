use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;
use tracing::error;

use crate::database::client::Db;
use crate::entities::community::board_article_entity::TABLE_NAME as ARTICLE_TABLE_NAME;
use crate::entities::listing::job_entity::TABLE_NAME as JOB_TABLE_NAME;
use crate::entities::listing::property_entity::TABLE_NAME as PROPERTY_TABLE_NAME;
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::utils::db_utils::{
    get_entity_view, get_listing, Listing, Pagination, QryConditions, RecordWithId,
};
use crate::models::view::comment::CommentView;

pub const TABLE_NAME: &str = "comment";

pub const SORT_FIELDS: &[&str] = &["created_at", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CommentStatus {
    Active,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum CommentGroup {
    Member,
    Job,
    Property,
    Article,
}

impl CommentGroup {
    pub fn table_name(&self) -> &'static str {
        match self {
            CommentGroup::Member => MEMBER_TABLE_NAME,
            CommentGroup::Job => JOB_TABLE_NAME,
            CommentGroup::Property => PROPERTY_TABLE_NAME,
            CommentGroup::Article => ARTICLE_TABLE_NAME,
        }
    }

    pub fn counter_field(&self) -> &'static str {
        match self {
            CommentGroup::Member => "member_comments",
            CommentGroup::Job => "job_comments",
            CommentGroup::Property => "property_comments",
            CommentGroup::Article => "article_comments",
        }
    }

    // status a target needs to accept comments
    fn open_condition(&self) -> &'static str {
        match self {
            CommentGroup::Member => "member_status='ACTIVE'",
            CommentGroup::Job => "job_status='HIRING'",
            CommentGroup::Property => "property_status='ACTIVE'",
            CommentGroup::Article => "article_status='ACTIVE'",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Comment {
    pub id: Thing,
    pub comment_status: CommentStatus,
    pub comment_group: CommentGroup,
    pub comment_content: String,
    pub comment_ref_id: Thing,
    pub member_id: Thing,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateComment {
    pub comment_group: CommentGroup,
    pub comment_content: String,
    pub comment_ref_id: Thing,
    pub member_id: Thing,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateCommentData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_status: Option<CommentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_content: Option<String>,
}

pub struct CommentDbService<'a> {
    pub db: &'a Db,
    pub ctx: &'a Ctx,
}

impl<'a> CommentDbService<'a> {
    pub async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS comment_status ON TABLE {TABLE_NAME} TYPE string DEFAULT 'ACTIVE' ASSERT $value INSIDE ['ACTIVE', 'DELETE'];
    DEFINE FIELD IF NOT EXISTS comment_group ON TABLE {TABLE_NAME} TYPE string ASSERT $value INSIDE ['MEMBER', 'JOB', 'PROPERTY', 'ARTICLE'];
    DEFINE FIELD IF NOT EXISTS comment_content ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>0;
    DEFINE FIELD IF NOT EXISTS comment_ref_id ON TABLE {TABLE_NAME} TYPE record<{MEMBER_TABLE_NAME}|{JOB_TABLE_NAME}|{PROPERTY_TABLE_NAME}|{ARTICLE_TABLE_NAME}>;
    DEFINE INDEX IF NOT EXISTS comment_ref_idx ON TABLE {TABLE_NAME} COLUMNS comment_ref_id;
    DEFINE FIELD IF NOT EXISTS member_id ON TABLE {TABLE_NAME} TYPE record<{MEMBER_TABLE_NAME}>;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
");
        let mutation = self.db.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    /// Whether the comment target exists in the status that accepts comments.
    pub async fn target_is_open(&self, group: CommentGroup, ref_id: &Thing) -> CtxResult<bool> {
        let mut res = self
            .db
            .query(format!(
                "SELECT id FROM $ref WHERE {};",
                group.open_condition()
            ))
            .bind(("ref", ref_id.clone()))
            .await?;
        Ok(res.take::<Option<RecordWithId>>(0)?.is_some())
    }

    pub async fn create(&self, data: CreateComment) -> CtxResult<Comment> {
        let res: Option<Comment> = self
            .db
            .create(TABLE_NAME)
            .content(data)
            .await
            .map_err(|err| {
                error!("comment create failed: {err}");
                self.ctx.to_ctx_error(AppError::CreateFailed)
            })?;
        res.ok_or_else(|| self.ctx.to_ctx_error(AppError::CreateFailed))
    }


    pub async fn get_view(&self, id: &Thing) -> CtxResult<Option<CommentView>> {
        Ok(get_entity_view::<CommentView>(self.db, id, None).await?)
    }

    pub async fn update_own_active(
        &self,
        id: &Thing,
        member: &Thing,
        data: UpdateCommentData,
    ) -> CtxResult<Option<Comment>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data WHERE member_id=$member AND comment_status='ACTIVE' RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("member", member.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Comment>>(0)?)
    }

    pub async fn get_list(
        &self,
        conditions: QryConditions,
        pagination: &Pagination,
    ) -> CtxResult<Listing<CommentView>> {
        Ok(get_listing::<CommentView>(self.db, TABLE_NAME, conditions, pagination, None).await?)
    }

    pub async fn remove(&self, id: &Thing) -> CtxResult<Option<Comment>> {
        let mut res = self
            .db
            .query("DELETE $id RETURN BEFORE;")
            .bind(("id", id.clone()))
            .await?;
        Ok(res.take::<Option<Comment>>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_counters() {
        assert_eq!(CommentGroup::Job.counter_field(), "job_comments");
        assert_eq!(CommentGroup::Article.table_name(), "board_article");
        assert_eq!(CommentGroup::Member.open_condition(), "member_status='ACTIVE'");
    }
}

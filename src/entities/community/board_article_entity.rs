use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::Thing;
use tracing::error;

use crate::database::client::Db;
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::utils::db_utils::{
    get_entity_view, get_listing, Listing, Pagination, QryConditions,
};
use crate::models::view::board_article::BoardArticleView;

pub const TABLE_NAME: &str = "board_article";

pub const SORT_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "article_views",
    "article_marks",
    "article_comments",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BoardArticleCategory {
    Free,
    Recommend,
    News,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum BoardArticleStatus {
    Active,
    Delete,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BoardArticle {
    pub id: Thing,
    pub article_category: BoardArticleCategory,
    pub article_status: BoardArticleStatus,
    pub article_title: String,
    pub article_content: String,
    pub article_image: Option<String>,
    pub member_id: Thing,
    pub article_views: i64,
    pub article_marks: i64,
    pub article_comments: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateBoardArticle {
    pub article_category: BoardArticleCategory,
    pub article_title: String,
    pub article_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_image: Option<String>,
    pub member_id: Thing,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateBoardArticleData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_category: Option<BoardArticleCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_status: Option<BoardArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_image: Option<String>,
}

pub struct BoardArticleDbService<'a> {
    pub db: &'a Db,
    pub ctx: &'a Ctx,
}

impl<'a> BoardArticleDbService<'a> {
    pub async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS article_category ON TABLE {TABLE_NAME} TYPE string ASSERT $value INSIDE ['FREE', 'RECOMMEND', 'NEWS'];
    DEFINE FIELD IF NOT EXISTS article_status ON TABLE {TABLE_NAME} TYPE string DEFAULT 'ACTIVE' ASSERT $value INSIDE ['ACTIVE', 'DELETE'];
    DEFINE FIELD IF NOT EXISTS article_title ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>0;
    DEFINE FIELD IF NOT EXISTS article_content ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS article_image ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS member_id ON TABLE {TABLE_NAME} TYPE record<{MEMBER_TABLE_NAME}>;
    DEFINE INDEX IF NOT EXISTS article_member_idx ON TABLE {TABLE_NAME} COLUMNS member_id;
    DEFINE FIELD IF NOT EXISTS article_views ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS article_marks ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS article_comments ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    DEFINE INDEX IF NOT EXISTS article_status_idx ON TABLE {TABLE_NAME} COLUMNS article_status;
");
        let mutation = self.db.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    pub async fn create(&self, data: CreateBoardArticle) -> CtxResult<BoardArticle> {
        let res: Option<BoardArticle> = self
            .db
            .create(TABLE_NAME)
            .content(data)
            .await
            .map_err(|err| {
                error!("board article create failed: {err}");
                self.ctx.to_ctx_error(AppError::CreateFailed)
            })?;
        res.ok_or_else(|| self.ctx.to_ctx_error(AppError::CreateFailed))
    }

    pub async fn get_active(&self, id: &Thing) -> CtxResult<Option<BoardArticle>> {
        let mut res = self
            .db
            .query("SELECT * FROM $id WHERE article_status='ACTIVE';")
            .bind(("id", id.clone()))
            .await?;
        Ok(res.take::<Option<BoardArticle>>(0)?)
    }

    pub async fn get_view(
        &self,
        id: &Thing,
        viewer: Option<Thing>,
    ) -> CtxResult<Option<BoardArticleView>> {
        Ok(get_entity_view::<BoardArticleView>(self.db, id, viewer).await?)
    }

    pub async fn update_own_active(
        &self,
        id: &Thing,
        member: &Thing,
        data: UpdateBoardArticleData,
    ) -> CtxResult<Option<BoardArticle>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data WHERE member_id=$member AND article_status='ACTIVE' RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("member", member.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<BoardArticle>>(0)?)
    }

    pub async fn update(
        &self,
        id: &Thing,
        data: UpdateBoardArticleData,
    ) -> CtxResult<Option<BoardArticle>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<BoardArticle>>(0)?)
    }


    pub async fn get_list(
        &self,
        conditions: QryConditions,
        pagination: &Pagination,
        viewer: Option<Thing>,
    ) -> CtxResult<Listing<BoardArticleView>> {
        Ok(
            get_listing::<BoardArticleView>(self.db, TABLE_NAME, conditions, pagination, viewer)
                .await?,
        )
    }

    pub async fn remove_deleted(&self, id: &Thing) -> CtxResult<Option<BoardArticle>> {
        let mut res = self
            .db
            .query("DELETE $id WHERE article_status='DELETE' RETURN BEFORE;")
            .bind(("id", id.clone()))
            .await?;
        Ok(res.take::<Option<BoardArticle>>(0)?)
    }
}

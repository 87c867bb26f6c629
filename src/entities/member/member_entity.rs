use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::{Datetime, Thing};
use tracing::error;

use crate::database::client::Db;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::utils::db_utils::{
    get_entity_view, get_listing, stats_editor, Listing, Pagination, QryConditions,
    StatisticModifier, ViewFieldSelector,
};
use crate::models::view::member::MemberView;

pub const TABLE_NAME: &str = "member";

pub const SORT_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "member_nick",
    "member_views",
    "member_marks",
    "member_jobs",
    "member_properties",
    "member_articles",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MemberType {
    User,
    Company,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum MemberStatus {
    Active,
    Block,
    Delete,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Member {
    pub id: Thing,
    pub member_type: MemberType,
    pub member_status: MemberStatus,
    pub member_nick: String,
    pub member_password: String,
    pub member_phone: Option<String>,
    pub member_full_name: Option<String>,
    pub member_image: Option<String>,
    pub member_desc: Option<String>,
    pub member_jobs: i64,
    pub member_properties: i64,
    pub member_articles: i64,
    pub member_views: i64,
    pub member_marks: i64,
    pub member_comments: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateMember {
    pub member_type: MemberType,
    pub member_nick: String,
    pub member_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_phone: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdateMemberData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_status: Option<MemberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_type: Option<MemberType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Datetime>,
}

pub struct MemberDbService<'a> {
    pub db: &'a Db,
    pub ctx: &'a Ctx,
}

const INDEX_NICK: &str = "member_nick_idx";

impl<'a> MemberDbService<'a> {
    pub async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS member_type ON TABLE {TABLE_NAME} TYPE string DEFAULT 'USER' ASSERT $value INSIDE ['USER', 'COMPANY', 'ADMIN'];
    DEFINE FIELD IF NOT EXISTS member_status ON TABLE {TABLE_NAME} TYPE string DEFAULT 'ACTIVE' ASSERT $value INSIDE ['ACTIVE', 'BLOCK', 'DELETE'];
    DEFINE FIELD IF NOT EXISTS member_nick ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>2;
    DEFINE INDEX IF NOT EXISTS {INDEX_NICK} ON TABLE {TABLE_NAME} COLUMNS member_nick UNIQUE;
    DEFINE FIELD IF NOT EXISTS member_password ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS member_phone ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS member_full_name ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS member_image ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS member_desc ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS member_jobs ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS member_properties ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS member_articles ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS member_views ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS member_marks ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS member_comments ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS deleted_at ON TABLE {TABLE_NAME} TYPE option<datetime>;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    DEFINE INDEX IF NOT EXISTS member_status_idx ON TABLE {TABLE_NAME} COLUMNS member_status;
");
        let mutation = self.db.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    pub async fn create(&self, data: CreateMember) -> CtxResult<Member> {
        let res: Option<Member> = self
            .db
            .create(TABLE_NAME)
            .content(data)
            .await
            .map_err(|err| {
                error!("member create failed: {err}");
                self.ctx.to_ctx_error(AppError::CreateFailed)
            })?;
        res.ok_or_else(|| self.ctx.to_ctx_error(AppError::CreateFailed))
    }

    pub async fn get(&self, id: &Thing) -> CtxResult<Option<Member>> {
        let mut res = self
            .db
            .query("SELECT * FROM $id;")
            .bind(("id", id.clone()))
            .await?;
        Ok(res.take::<Option<Member>>(0)?)
    }

    /// Loads an ACTIVE member, optionally restricted to the given types.
    pub async fn must_be_active(&self, id: &Thing, allowed: &[MemberType]) -> CtxResult<Member> {
        let member = self
            .get(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::AuthenticationFail))?;
        if member.member_status != MemberStatus::Active {
            return Err(self.ctx.to_ctx_error(AppError::Blocked));
        }
        if !allowed.is_empty() && !allowed.contains(&member.member_type) {
            let required = allowed
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join("|");
            return Err(self
                .ctx
                .to_ctx_error(AppError::AuthorizationFail { required }));
        }
        Ok(member)
    }

    pub async fn get_by_nick(&self, nick: &str) -> CtxResult<Option<Member>> {
        let mut res = self
            .db
            .query(format!(
                "SELECT * FROM {TABLE_NAME} WHERE member_nick=$nick LIMIT 1;"
            ))
            .bind(("nick", nick.to_string()))
            .await?;
        Ok(res.take::<Option<Member>>(0)?)
    }

    pub async fn get_view(&self, id: &Thing, viewer: Option<Thing>) -> CtxResult<Option<MemberView>> {
        Ok(get_entity_view::<MemberView>(self.db, id, viewer).await?)
    }

    pub async fn get_active_view(
        &self,
        id: &Thing,
        viewer: Option<Thing>,
    ) -> CtxResult<Option<MemberView>> {
        let query = format!(
            "SELECT {} FROM $id WHERE member_status='ACTIVE';",
            MemberView::get_select_query_fields()
        );
        let mut res = self
            .db
            .query(query)
            .bind(("id", id.clone()))
            .bind(("member", viewer))
            .await?;
        Ok(res.take::<Option<MemberView>>(0)?)
    }

    /// Applies `data` to an ACTIVE member, `None` when nothing matched.
    pub async fn update_active(
        &self,
        id: &Thing,
        data: UpdateMemberData,
    ) -> CtxResult<Option<Member>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data WHERE member_status='ACTIVE' RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Member>>(0)?)
    }

    /// Applies `data` regardless of the member's status.
    pub async fn update(&self, id: &Thing, data: UpdateMemberData) -> CtxResult<Option<Member>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Member>>(0)?)
    }

    pub async fn stats_editor(
        &self,
        id: &Thing,
        target_key: &'static str,
        modifier: i64,
    ) -> CtxResult<Option<Member>> {
        let input = StatisticModifier {
            id: id.clone(),
            target_key,
            modifier,
        };
        Ok(stats_editor::<Member>(self.db, input).await?)
    }

    pub async fn get_list(
        &self,
        conditions: QryConditions,
        pagination: &Pagination,
    ) -> CtxResult<Listing<MemberView>> {
        Ok(get_listing::<MemberView>(self.db, TABLE_NAME, conditions, pagination, None).await?)
    }
}

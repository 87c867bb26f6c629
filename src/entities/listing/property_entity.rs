use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use surrealdb::sql::{Datetime, Thing};
use tracing::error;

use super::{Location, LOCATION_VALUES};
use crate::database::client::Db;
use crate::entities::member::member_entity::TABLE_NAME as MEMBER_TABLE_NAME;
use crate::middleware::ctx::Ctx;
use crate::middleware::error::{AppError, CtxResult};
use crate::middleware::utils::db_utils::{
    get_entity_view, get_listing, Listing, Pagination, QryConditions,
};
use crate::models::view::property::PropertyView;

pub const TABLE_NAME: &str = "property";

pub const SORT_FIELDS: &[&str] = &[
    "created_at",
    "updated_at",
    "property_price",
    "property_views",
    "property_marks",
    "property_comments",
];

pub const OPTION_FIELDS: &[&str] = &["property_barter", "property_rent"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PropertyType {
    Apartment,
    Villa,
    House,
    Office,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PropertyStatus {
    Active,
    Sold,
    Delete,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Property {
    pub id: Thing,
    pub property_type: PropertyType,
    pub property_status: PropertyStatus,
    pub property_location: Location,
    pub property_address: String,
    pub property_title: String,
    pub property_price: i64,
    pub property_square: i64,
    pub property_rooms: i64,
    pub property_beds: i64,
    pub property_images: Vec<String>,
    pub property_desc: Option<String>,
    pub property_barter: bool,
    pub property_rent: bool,
    pub member_id: Thing,
    pub property_views: i64,
    pub property_marks: i64,
    pub property_comments: i64,
    pub sold_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateProperty {
    pub property_type: PropertyType,
    pub property_location: Location,
    pub property_address: String,
    pub property_title: String,
    pub property_price: i64,
    pub property_square: i64,
    pub property_rooms: i64,
    pub property_beds: i64,
    pub property_images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_desc: Option<String>,
    pub property_barter: bool,
    pub property_rent: bool,
    pub member_id: Thing,
}

#[derive(Debug, Default, Serialize)]
pub struct UpdatePropertyData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_status: Option<PropertyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_square: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_rooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_beds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_barter: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_rent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sold_at: Option<Datetime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Datetime>,
}

pub struct PropertyDbService<'a> {
    pub db: &'a Db,
    pub ctx: &'a Ctx,
}

impl<'a> PropertyDbService<'a> {
    pub async fn mutate_db(&self) -> Result<(), AppError> {
        let sql = format!("
    DEFINE TABLE IF NOT EXISTS {TABLE_NAME} SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS property_type ON TABLE {TABLE_NAME} TYPE string ASSERT $value INSIDE ['APARTMENT', 'VILLA', 'HOUSE', 'OFFICE'];
    DEFINE FIELD IF NOT EXISTS property_status ON TABLE {TABLE_NAME} TYPE string DEFAULT 'ACTIVE' ASSERT $value INSIDE ['ACTIVE', 'SOLD', 'DELETE'];
    DEFINE FIELD IF NOT EXISTS property_location ON TABLE {TABLE_NAME} TYPE string ASSERT $value INSIDE {LOCATION_VALUES};
    DEFINE FIELD IF NOT EXISTS property_address ON TABLE {TABLE_NAME} TYPE string;
    DEFINE FIELD IF NOT EXISTS property_title ON TABLE {TABLE_NAME} TYPE string ASSERT string::len(string::trim($value))>0;
    DEFINE FIELD IF NOT EXISTS property_price ON TABLE {TABLE_NAME} TYPE number;
    DEFINE FIELD IF NOT EXISTS property_square ON TABLE {TABLE_NAME} TYPE number;
    DEFINE FIELD IF NOT EXISTS property_rooms ON TABLE {TABLE_NAME} TYPE number;
    DEFINE FIELD IF NOT EXISTS property_beds ON TABLE {TABLE_NAME} TYPE number;
    DEFINE FIELD IF NOT EXISTS property_images ON TABLE {TABLE_NAME} TYPE array<string>;
    DEFINE FIELD IF NOT EXISTS property_desc ON TABLE {TABLE_NAME} TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS property_barter ON TABLE {TABLE_NAME} TYPE bool DEFAULT false;
    DEFINE FIELD IF NOT EXISTS property_rent ON TABLE {TABLE_NAME} TYPE bool DEFAULT false;
    DEFINE FIELD IF NOT EXISTS member_id ON TABLE {TABLE_NAME} TYPE record<{MEMBER_TABLE_NAME}>;
    DEFINE INDEX IF NOT EXISTS property_member_idx ON TABLE {TABLE_NAME} COLUMNS member_id;
    DEFINE FIELD IF NOT EXISTS property_views ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS property_marks ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS property_comments ON TABLE {TABLE_NAME} TYPE number DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS sold_at ON TABLE {TABLE_NAME} TYPE option<datetime>;
    DEFINE FIELD IF NOT EXISTS deleted_at ON TABLE {TABLE_NAME} TYPE option<datetime>;
    DEFINE FIELD IF NOT EXISTS created_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE $before OR time::now();
    DEFINE FIELD IF NOT EXISTS updated_at ON TABLE {TABLE_NAME} TYPE datetime DEFAULT time::now() VALUE time::now();
    DEFINE INDEX IF NOT EXISTS property_status_idx ON TABLE {TABLE_NAME} COLUMNS property_status;
");
        let mutation = self.db.query(sql).await?;
        mutation.check()?;
        Ok(())
    }

    pub async fn create(&self, data: CreateProperty) -> CtxResult<Property> {
        let res: Option<Property> = self
            .db
            .create(TABLE_NAME)
            .content(data)
            .await
            .map_err(|err| {
                error!("property create failed: {err}");
                self.ctx.to_ctx_error(AppError::CreateFailed)
            })?;
        res.ok_or_else(|| self.ctx.to_ctx_error(AppError::CreateFailed))
    }

    pub async fn get_with_status(
        &self,
        id: &Thing,
        status: PropertyStatus,
    ) -> CtxResult<Option<Property>> {
        let mut res = self
            .db
            .query("SELECT * FROM $id WHERE property_status=$status;")
            .bind(("id", id.clone()))
            .bind(("status", status))
            .await?;
        Ok(res.take::<Option<Property>>(0)?)
    }

    pub async fn get_view(
        &self,
        id: &Thing,
        viewer: Option<Thing>,
    ) -> CtxResult<Option<PropertyView>> {
        Ok(get_entity_view::<PropertyView>(self.db, id, viewer).await?)
    }

    pub async fn update_own_active(
        &self,
        id: &Thing,
        member: &Thing,
        data: UpdatePropertyData,
    ) -> CtxResult<Option<Property>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data WHERE member_id=$member AND property_status='ACTIVE' RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("member", member.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Property>>(0)?)
    }

    pub async fn update(&self, id: &Thing, data: UpdatePropertyData) -> CtxResult<Option<Property>> {
        let mut res = self
            .db
            .query("UPDATE $id MERGE $data RETURN AFTER;")
            .bind(("id", id.clone()))
            .bind(("data", data))
            .await?;
        Ok(res.take::<Option<Property>>(0)?)
    }


    pub async fn get_list(
        &self,
        conditions: QryConditions,
        pagination: &Pagination,
        viewer: Option<Thing>,
    ) -> CtxResult<Listing<PropertyView>> {
        Ok(get_listing::<PropertyView>(self.db, TABLE_NAME, conditions, pagination, viewer).await?)
    }

    pub async fn remove_deleted(&self, id: &Thing) -> CtxResult<Option<Property>> {
        let mut res = self
            .db
            .query("DELETE $id WHERE property_status='DELETE' RETURN BEFORE;")
            .bind(("id", id.clone()))
            .await?;
        Ok(res.take::<Option<Property>>(0)?)
    }
}

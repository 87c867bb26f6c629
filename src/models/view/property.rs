use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::entities::listing::property_entity::{PropertyStatus, PropertyType};
use crate::entities::listing::Location;
use crate::entities::mark::{me_marked_query_field, MeMarked};
use crate::middleware::utils::db_utils::ViewFieldSelector;
use crate::models::view::member::{MemberDataView, MEMBER_DATA_FIELDS};
use crate::utils::validate_utils::serialize_thing;

#[derive(Debug, Serialize, Deserialize)]
pub struct PropertyView {
    #[serde(serialize_with = "serialize_thing")]
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
    #[serde(serialize_with = "serialize_thing")]
    pub member_id: Thing,
    pub property_views: i64,
    pub property_marks: i64,
    pub property_comments: i64,
    pub sold_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub member_data: Option<MemberDataView>,
    #[serde(default)]
    pub me_marked: Vec<MeMarked>,
}

impl ViewFieldSelector for PropertyView {
    fn get_select_query_fields() -> String {
        format!(
            "id,
        property_type,
        property_status,
        property_location,
        property_address,
        property_title,
        property_price,
        property_square,
        property_rooms,
        property_beds,
        property_images,
        property_desc,
        property_barter,
        property_rent,
        member_id,
        property_views,
        property_marks,
        property_comments,
        sold_at,
        deleted_at,
        created_at,
        updated_at,
        {MEMBER_DATA_FIELDS},
        {}",
            me_marked_query_field()
        )
    }
}

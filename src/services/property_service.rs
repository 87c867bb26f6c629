use chrono::Utc;
use serde::Deserialize;
use surrealdb::sql::Thing;
use tracing::info;
use validator::Validate;

use crate::{
    database::client::Db,
    entities::{
        listing::{
            property_entity::{
                CreateProperty, Property, PropertyDbService, PropertyStatus, PropertyType,
                UpdatePropertyData, OPTION_FIELDS, SORT_FIELDS, TABLE_NAME,
            },
            Location,
        },
        mark::MarkGroup,
        member::member_entity::{MemberDbService, MemberType, TABLE_NAME as MEMBER_TABLE_NAME},
        view::ViewGroup,
    },
    interfaces::repositories::{
        mark::MarksRepositoryInterface, view::ViewsRepositoryInterface,
    },
    middleware::{
        ctx::Ctx,
        error::{AppError, AppResult, CtxResult},
        utils::{
            db_utils::{Listing, QryConditions, QryOrder},
            string_utils::get_table_thing,
        },
    },
    models::{
        inquiry::{options_condition, sorted_pagination, NumberRange, OrdinaryInquiry},
        view::{property::PropertyView, RemovedView},
    },
    utils::validate_utils::{validate_images, validate_not_blank},
};

use super::{mark_service::MarkService, view_service::ViewService};

const MEMBER_PROPERTIES: &str = "member_properties";

#[derive(Debug, Deserialize, Validate)]
pub struct PropertyInput {
    pub property_type: PropertyType,
    pub property_location: Location,
    #[validate(custom(function = validate_not_blank))]
    pub property_address: String,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub property_title: String,
    #[validate(range(min = 0))]
    pub property_price: i64,
    #[validate(range(min = 1))]
    pub property_square: i64,
    #[validate(range(min = 0))]
    pub property_rooms: i64,
    #[validate(range(min = 0))]
    pub property_beds: i64,
    #[validate(custom(function = validate_images))]
    pub property_images: Vec<String>,
    #[validate(length(max = 2000))]
    pub property_desc: Option<String>,
    #[serde(default)]
    pub property_barter: bool,
    #[serde(default)]
    pub property_rent: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PropertyUpdateInput {
    pub id: String,
    pub property_type: Option<PropertyType>,
    pub property_status: Option<PropertyStatus>,
    pub property_location: Option<Location>,
    #[validate(custom(function = validate_not_blank))]
    pub property_address: Option<String>,
    #[validate(custom(function = validate_not_blank), length(max = 100))]
    pub property_title: Option<String>,
    #[validate(range(min = 0))]
    pub property_price: Option<i64>,
    #[validate(range(min = 1))]
    pub property_square: Option<i64>,
    #[validate(range(min = 0))]
    pub property_rooms: Option<i64>,
    #[validate(range(min = 0))]
    pub property_beds: Option<i64>,
    #[validate(custom(function = validate_images))]
    pub property_images: Option<Vec<String>>,
    #[validate(length(max = 2000))]
    pub property_desc: Option<String>,
    pub property_barter: Option<bool>,
    pub property_rent: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PropertySearch {
    pub member_id: Option<String>,
    pub location_list: Option<Vec<Location>>,
    pub type_list: Option<Vec<PropertyType>>,
    pub rooms_list: Option<Vec<i64>>,
    pub beds_list: Option<Vec<i64>>,
    #[validate(nested)]
    pub price_range: Option<NumberRange>,
    #[validate(nested)]
    pub square_range: Option<NumberRange>,
    pub options: Option<Vec<String>>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PropertiesInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    #[validate(nested)]
    pub search: PropertySearch,
}

#[derive(Debug, Default, Deserialize)]
pub struct AgentPropertySearch {
    pub property_status: Option<PropertyStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AgentPropertiesInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: AgentPropertySearch,
}

#[derive(Debug, Default, Deserialize)]
pub struct AllPropertiesSearch {
    pub property_status: Option<PropertyStatus>,
    pub location_list: Option<Vec<Location>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AllPropertiesInquiry {
    #[validate(range(min = 1))]
    pub page: u32,
    #[validate(range(min = 1))]
    pub limit: u32,
    pub sort: Option<String>,
    pub direction: Option<QryOrder>,
    #[serde(default)]
    pub search: AllPropertiesSearch,
}

pub fn property_search_conditions(search: PropertySearch) -> AppResult<QryConditions> {
    let mut conditions = QryConditions::new();
    conditions.push("property_status = 'ACTIVE'");

    if let Some(member_id) = search.member_id {
        let member = get_table_thing(MEMBER_TABLE_NAME, &member_id)?;
        conditions.push_bound("member_id = <record>$member_id", "member_id", member.to_raw())?;
    }
    if let Some(locations) = search.location_list.filter(|l| !l.is_empty()) {
        conditions.push_bound(
            "property_location IN $location_list",
            "location_list",
            locations,
        )?;
    }
    if let Some(types) = search.type_list.filter(|t| !t.is_empty()) {
        conditions.push_bound("property_type IN $type_list", "type_list", types)?;
    }
    if let Some(rooms) = search.rooms_list.filter(|r| !r.is_empty()) {
        conditions.push_bound("property_rooms IN $rooms_list", "rooms_list", rooms)?;
    }
    if let Some(beds) = search.beds_list.filter(|b| !b.is_empty()) {
        conditions.push_bound("property_beds IN $beds_list", "beds_list", beds)?;
    }
    if let Some(range) = search.price_range {
        conditions.push(range.condition("property_price"));
    }
    if let Some(range) = search.square_range {
        conditions.push(range.condition("property_square"));
    }
    if let Some(options) = options_condition(&search.options.unwrap_or_default(), OPTION_FIELDS)? {
        conditions.push(options);
    }
    if let Some(text) = search.text.filter(|t| !t.trim().is_empty()) {
        conditions.push_bound(
            "string::contains(string::lowercase(property_title), $text)",
            "text",
            text.trim().to_lowercase(),
        )?;
    }
    Ok(conditions)
}

pub struct PropertyService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    ctx: &'a Ctx,
    property_repository: PropertyDbService<'a>,
    member_repository: MemberDbService<'a>,
    mark_service: MarkService<'a, M>,
    view_service: ViewService<'a, V>,
}

impl<'a, M, V> PropertyService<'a, M, V>
where
    M: MarksRepositoryInterface,
    V: ViewsRepositoryInterface,
{
    pub fn new(db: &'a Db, ctx: &'a Ctx, marks: &'a M, views: &'a V) -> Self {
        Self {
            ctx,
            property_repository: PropertyDbService { db, ctx },
            member_repository: MemberDbService { db, ctx },
            mark_service: MarkService::new(db, ctx, marks),
            view_service: ViewService::new(db, ctx, views),
        }
    }

    pub fn parse_id(&self, id: &str) -> CtxResult<Thing> {
        get_table_thing(TABLE_NAME, id).map_err(|e| self.ctx.to_ctx_error(e))
    }

    pub async fn create_property(
        &self,
        me: &Thing,
        input: PropertyInput,
    ) -> CtxResult<PropertyView> {
        input.validate()?;
        self.member_repository
            .must_be_active(me, &[MemberType::Company])
            .await?;

        let property = self
            .property_repository
            .create(CreateProperty {
                property_type: input.property_type,
                property_location: input.property_location,
                property_address: input.property_address,
                property_title: input.property_title.trim().to_string(),
                property_price: input.property_price,
                property_square: input.property_square,
                property_rooms: input.property_rooms,
                property_beds: input.property_beds,
                property_images: input.property_images,
                property_desc: input.property_desc,
                property_barter: input.property_barter,
                property_rent: input.property_rent,
                member_id: me.clone(),
            })
            .await?;

        self.member_repository
            .stats_editor(me, MEMBER_PROPERTIES, 1)
            .await?;
        info!("property {} created by {me}", property.id);

        self.view_of(&property.id, Some(me.clone())).await
    }

    pub async fn get_property(
        &self,
        viewer: Option<Thing>,
        id: &Thing,
    ) -> CtxResult<PropertyView> {
        self.property_repository
            .get_with_status(id, PropertyStatus::Active)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        if let Some(viewer) = viewer.as_ref() {
            self.view_service
                .record_view(viewer, id, ViewGroup::Property)
                .await?;
        }
        self.view_of(id, viewer).await
    }

    pub async fn update_property(
        &self,
        me: &Thing,
        input: PropertyUpdateInput,
    ) -> CtxResult<PropertyView> {
        input.validate()?;
        self.member_repository
            .must_be_active(me, &[MemberType::Company])
            .await?;

        let id = self.parse_id(&input.id)?;
        let status = input.property_status;
        let updated = self
            .property_repository
            .update_own_active(&id, me, update_data(input))
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        if matches!(status, Some(PropertyStatus::Sold | PropertyStatus::Delete)) {
            self.member_repository
                .stats_editor(&updated.member_id, MEMBER_PROPERTIES, -1)
                .await?;
        }

        self.view_of(&id, Some(me.clone())).await
    }

    pub async fn get_properties(
        &self,
        viewer: Option<Thing>,
        inquiry: PropertiesInquiry,
    ) -> CtxResult<Listing<PropertyView>> {
        inquiry.validate()?;
        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;
        let conditions = property_search_conditions(inquiry.search)?;
        self.property_repository
            .get_list(conditions, &pagination, viewer)
            .await
    }

    pub async fn get_agent_properties(
        &self,
        me: &Thing,
        inquiry: AgentPropertiesInquiry,
    ) -> CtxResult<Listing<PropertyView>> {
        inquiry.validate()?;
        self.member_repository
            .must_be_active(me, &[MemberType::Company])
            .await?;

        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        conditions.push_bound("member_id = <record>$agent", "agent", me.to_raw())?;
        match inquiry.search.property_status {
            Some(PropertyStatus::Delete) => {
                return Err(self.ctx.to_ctx_error(AppError::NotAllowedRequest))
            }
            Some(status) => {
                conditions.push_bound(
                    "property_status = $property_status",
                    "property_status",
                    status,
                )?;
            }
            None => {
                conditions.push("property_status != 'DELETE'");
            }
        }

        self.property_repository
            .get_list(conditions, &pagination, Some(me.clone()))
            .await
    }

    pub async fn like_target_property(&self, me: &Thing, id: &Thing) -> CtxResult<PropertyView> {
        self.member_repository.must_be_active(me, &[]).await?;
        self.property_repository
            .get_with_status(id, PropertyStatus::Active)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))?;

        self.mark_service
            .toggle_target::<Property>(me, id, MarkGroup::Property)
            .await?;

        self.view_of(id, Some(me.clone())).await
    }

    pub async fn get_favorites(
        &self,
        me: &Thing,
        inquiry: OrdinaryInquiry,
    ) -> CtxResult<Listing<PropertyView>> {
        inquiry.validate()?;
        self.mark_service
            .get_favorites::<PropertyView>(me, MarkGroup::Property, &inquiry)
            .await
    }

    pub async fn get_visited(
        &self,
        me: &Thing,
        inquiry: OrdinaryInquiry,
    ) -> CtxResult<Listing<PropertyView>> {
        inquiry.validate()?;
        self.view_service
            .get_visited::<PropertyView>(me, ViewGroup::Property, &inquiry)
            .await
    }

    pub async fn get_all_properties_by_admin(
        &self,
        admin: &Thing,
        inquiry: AllPropertiesInquiry,
    ) -> CtxResult<Listing<PropertyView>> {
        inquiry.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let pagination = sorted_pagination(
            inquiry.page,
            inquiry.limit,
            inquiry.sort.as_deref(),
            inquiry.direction,
            SORT_FIELDS,
        )?;

        let mut conditions = QryConditions::new();
        if let Some(status) = inquiry.search.property_status {
            conditions.push_bound(
                "property_status = $property_status",
                "property_status",
                status,
            )?;
        }
        if let Some(locations) = inquiry.search.location_list.filter(|l| !l.is_empty()) {
            conditions.push_bound(
                "property_location IN $location_list",
                "location_list",
                locations,
            )?;
        }

        self.property_repository
            .get_list(conditions, &pagination, None)
            .await
    }

    pub async fn update_property_by_admin(
        &self,
        admin: &Thing,
        input: PropertyUpdateInput,
    ) -> CtxResult<PropertyView> {
        input.validate()?;
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let id = self.parse_id(&input.id)?;
        let was_active = self
            .property_repository
            .get_with_status(&id, PropertyStatus::Active)
            .await?
            .is_some();

        let status = input.property_status;
        let updated = self
            .property_repository
            .update(&id, update_data(input))
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::UpdateFailed))?;

        let modifier = match (was_active, status) {
            (true, Some(PropertyStatus::Sold | PropertyStatus::Delete)) => -1,
            (false, Some(PropertyStatus::Active)) => 1,
            _ => 0,
        };
        if modifier != 0 {
            self.member_repository
                .stats_editor(&updated.member_id, MEMBER_PROPERTIES, modifier)
                .await?;
        }

        self.view_of(&id, None).await
    }

    pub async fn remove_property_by_admin(
        &self,
        admin: &Thing,
        id: &Thing,
    ) -> CtxResult<RemovedView> {
        self.member_repository
            .must_be_active(admin, &[MemberType::Admin])
            .await?;

        let removed = self
            .property_repository
            .remove_deleted(id)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::RemoveFailed))?;
        info!("property {} removed by admin {admin}", removed.id);
        Ok(RemovedView { id: removed.id })
    }

    async fn view_of(&self, id: &Thing, viewer: Option<Thing>) -> CtxResult<PropertyView> {
        self.property_repository
            .get_view(id, viewer)
            .await?
            .ok_or_else(|| self.ctx.to_ctx_error(AppError::NoDataFound))
    }
}

fn update_data(input: PropertyUpdateInput) -> UpdatePropertyData {
    let now = || Some(Utc::now().into());
    UpdatePropertyData {
        property_type: input.property_type,
        property_status: input.property_status,
        property_location: input.property_location,
        property_address: input.property_address,
        property_title: input.property_title.map(|t| t.trim().to_string()),
        property_price: input.property_price,
        property_square: input.property_square,
        property_rooms: input.property_rooms,
        property_beds: input.property_beds,
        property_images: input.property_images,
        property_desc: input.property_desc,
        property_barter: input.property_barter,
        property_rent: input.property_rent,
        sold_at: match input.property_status {
            Some(PropertyStatus::Sold) => now(),
            _ => None,
        },
        deleted_at: match input.property_status {
            Some(PropertyStatus::Delete) => now(),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ranges_and_options() {
        let search = PropertySearch {
            price_range: Some(NumberRange {
                start: 1000,
                end: 9000,
            }),
            square_range: Some(NumberRange { start: 30, end: 90 }),
            options: Some(vec![
                "property_barter".to_string(),
                "property_rent".to_string(),
            ]),
            ..Default::default()
        };
        assert_eq!(
            property_search_conditions(search).unwrap().to_where(),
            "WHERE property_status = 'ACTIVE' \
             AND property_price >= 1000 AND property_price <= 9000 \
             AND property_square >= 30 AND property_square <= 90 \
             AND (property_barter = true OR property_rent = true)"
        );
    }

    #[test]
    fn search_rejects_foreign_member_id() {
        let search = PropertySearch {
            member_id: Some("job:abc".to_string()),
            ..Default::default()
        };
        assert!(property_search_conditions(search).is_err());
    }
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};

use crate::{
    middleware::{
        auth_with_login_access::AuthWithLoginAccess, ctx::Ctx, error::CtxResult,
        mw_ctx::CtxState, utils::db_utils::Listing,
    },
    models::{inquiry::OrdinaryInquiry, view::property::PropertyView},
    services::property_service::{
        AgentPropertiesInquiry, PropertiesInquiry, PropertyInput, PropertyService,
        PropertyUpdateInput,
    },
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/properties", post(create_property))
        .route("/api/properties", patch(update_property))
        .route("/api/properties/list", post(get_properties))
        .route("/api/properties/agent", post(get_agent_properties))
        .route("/api/properties/favorites", post(get_favorites))
        .route("/api/properties/visited", post(get_visited))
        .route("/api/properties/:id", get(get_property))
        .route("/api/properties/:id/like", post(like_property))
}

async fn create_property(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<PropertyInput>,
) -> CtxResult<Json<PropertyView>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let property = service.create_property(&auth_data.member_id, body).await?;
    Ok(Json(property))
}

async fn get_property(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Path(id): Path<String>,
) -> CtxResult<Json<PropertyView>> {
    let service = PropertyService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let property = service
        .get_property(ctx.optional_member_thing(), &id)
        .await?;
    Ok(Json(property))
}

async fn update_property(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<PropertyUpdateInput>,
) -> CtxResult<Json<PropertyView>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let property = service.update_property(&auth_data.member_id, body).await?;
    Ok(Json(property))
}

async fn get_properties(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Json(body): Json<PropertiesInquiry>,
) -> CtxResult<Json<Listing<PropertyView>>> {
    let service = PropertyService::new(&state.db.client, &ctx, &state.db.marks, &state.db.views);
    let properties = service
        .get_properties(ctx.optional_member_thing(), body)
        .await?;
    Ok(Json(properties))
}

async fn get_agent_properties(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<AgentPropertiesInquiry>,
) -> CtxResult<Json<Listing<PropertyView>>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let properties = service
        .get_agent_properties(&auth_data.member_id, body)
        .await?;
    Ok(Json(properties))
}

async fn like_property(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Path(id): Path<String>,
) -> CtxResult<Json<PropertyView>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let id = service.parse_id(&id)?;
    let property = service
        .like_target_property(&auth_data.member_id, &id)
        .await?;
    Ok(Json(property))
}

async fn get_favorites(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<OrdinaryInquiry>,
) -> CtxResult<Json<Listing<PropertyView>>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let properties = service.get_favorites(&auth_data.member_id, body).await?;
    Ok(Json(properties))
}

async fn get_visited(
    auth_data: AuthWithLoginAccess,
    State(state): State<Arc<CtxState>>,
    Json(body): Json<OrdinaryInquiry>,
) -> CtxResult<Json<Listing<PropertyView>>> {
    let ctx = &auth_data.ctx;
    let service = PropertyService::new(&state.db.client, ctx, &state.db.marks, &state.db.views);
    let properties = service.get_visited(&auth_data.member_id, body).await?;
    Ok(Json(properties))
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use refdata_catalog::TierId;
use refdata_core::PageRequest;
use refdata_geography::CityId;
use refdata_network::{
    AgencyFilter, AgencyId, AgencyPatch, AgencyTierFilter, AgencyTierId, AgencyTierPatch,
    PartnerFilter, PartnerId, PartnerPatch,
};
use refdata_registry::network::{
    CreateAgency, CreateAgencyTier, CreatePartner, ListAgencies, ListAgencyTiers, ListPartners,
    PatchAgency, PatchAgencyTier, PatchPartner, UpdateAgency, UpdateAgencyTier, UpdatePartner,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .nest("/agencies", agencies())
        .nest("/agency-tiers", agency_tiers())
        .nest("/partners", partners())
}

fn agencies() -> Router {
    Router::new()
        .route("/", post(create_agency).get(list_agencies))
        .route(
            "/:id",
            get(get_agency).put(update_agency).patch(patch_agency).delete(disable_agency),
        )
        .route("/:id/activate", post(activate_agency))
}

fn agency_tiers() -> Router {
    Router::new()
        .route("/", post(create_agency_tier).get(list_agency_tiers))
        .route(
            "/:id",
            get(get_agency_tier)
                .put(update_agency_tier)
                .patch(patch_agency_tier)
                .delete(disable_agency_tier),
        )
        .route("/:id/activate", post(activate_agency_tier))
}

fn partners() -> Router {
    Router::new()
        .route("/", post(create_partner).get(list_partners))
        .route(
            "/:id",
            get(get_partner)
                .put(update_partner)
                .patch(patch_partner)
                .delete(disable_partner),
        )
        .route("/:id/activate", post(activate_partner))
}

fn page_request(
    page_number: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, axum::response::Response> {
    PageRequest::new(page_number.unwrap_or(1), page_size.unwrap_or(20))
        .map_err(errors::domain_error_to_response)
}

// --- Agency ---

async fn create_agency(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAgencyRequest>,
) -> axum::response::Response {
    let city_id = match errors::parse_id(&body.city_id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services
        .network
        .create_agency(CreateAgency {
            city_id,
            code: body.code,
            name: body.name,
            address: body.address,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_agency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAgencyRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_id(&body.city_id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services
        .network
        .update_agency(UpdateAgency {
            id,
            city_id,
            code: body.code,
            name: body.name,
            address: body.address,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_agency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchAgencyRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_opt_id(body.city_id.as_deref()) {
        Ok(v) => v.map(CityId::new),
        Err(resp) => return resp,
    };
    let patch = AgencyPatch {
        city_id,
        code: body.code,
        name: body.name,
        address: body.address,
    };
    match services.network.patch_agency(PatchAgency { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_agency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    match services.network.disable_agency(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_agency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    match services.network.activate_agency(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_agency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    match services.network.get_agency(&id).await {
        Ok(agency) => (StatusCode::OK, Json(dto::agency_to_json(agency))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_agencies(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::AgencyListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_opt_id(q.city_id.as_deref()) {
        Ok(v) => v.map(CityId::new),
        Err(resp) => return resp,
    };
    let filter = AgencyFilter {
        code: q.code,
        name: q.name,
        city_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .network
        .list_agencies(ListAgencies {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::agency_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- AgencyTier ---

async fn create_agency_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAgencyTierRequest>,
) -> axum::response::Response {
    let agency_id = match errors::parse_id(&body.agency_id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    let tier_id = match errors::parse_id(&body.tier_id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    match services
        .network
        .create_agency_tier(CreateAgencyTier {
            agency_id,
            tier_id,
            code: body.code,
            commission_bps: body.commission_bps,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_agency_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAgencyTierRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyTierId::new(v),
        Err(resp) => return resp,
    };
    let agency_id = match errors::parse_id(&body.agency_id) {
        Ok(v) => AgencyId::new(v),
        Err(resp) => return resp,
    };
    let tier_id = match errors::parse_id(&body.tier_id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    match services
        .network
        .update_agency_tier(UpdateAgencyTier {
            id,
            agency_id,
            tier_id,
            code: body.code,
            commission_bps: body.commission_bps,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_agency_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchAgencyTierRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyTierId::new(v),
        Err(resp) => return resp,
    };
    let agency_id = match errors::parse_opt_id(body.agency_id.as_deref()) {
        Ok(v) => v.map(AgencyId::new),
        Err(resp) => return resp,
    };
    let tier_id = match errors::parse_opt_id(body.tier_id.as_deref()) {
        Ok(v) => v.map(TierId::new),
        Err(resp) => return resp,
    };
    let patch = AgencyTierPatch {
        agency_id,
        tier_id,
        code: body.code,
        commission_bps: body.commission_bps,
    };
    match services
        .network
        .patch_agency_tier(PatchAgencyTier { id, patch })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_agency_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyTierId::new(v),
        Err(resp) => return resp,
    };
    match services.network.disable_agency_tier(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_agency_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyTierId::new(v),
        Err(resp) => return resp,
    };
    match services.network.activate_agency_tier(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_agency_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => AgencyTierId::new(v),
        Err(resp) => return resp,
    };
    match services.network.get_agency_tier(&id).await {
        Ok(link) => (StatusCode::OK, Json(dto::agency_tier_to_json(link))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_agency_tiers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::AgencyTierListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let agency_id = match errors::parse_opt_id(q.agency_id.as_deref()) {
        Ok(v) => v.map(AgencyId::new),
        Err(resp) => return resp,
    };
    let tier_id = match errors::parse_opt_id(q.tier_id.as_deref()) {
        Ok(v) => v.map(TierId::new),
        Err(resp) => return resp,
    };
    let filter = AgencyTierFilter {
        code: q.code,
        agency_id,
        tier_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .network
        .list_agency_tiers(ListAgencyTiers {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => (
            StatusCode::OK,
            Json(dto::page_to_json(page, dto::agency_tier_to_json)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Partner ---

async fn create_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreatePartnerRequest>,
) -> axum::response::Response {
    match services
        .network
        .create_partner(CreatePartner {
            code: body.code,
            name: body.name,
            contact_email: body.contact_email,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdatePartnerRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => PartnerId::new(v),
        Err(resp) => return resp,
    };
    match services
        .network
        .update_partner(UpdatePartner {
            id,
            code: body.code,
            name: body.name,
            contact_email: body.contact_email,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchPartnerRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => PartnerId::new(v),
        Err(resp) => return resp,
    };
    let patch = PartnerPatch {
        code: body.code,
        name: body.name,
        contact_email: body.contact_email,
    };
    match services.network.patch_partner(PatchPartner { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => PartnerId::new(v),
        Err(resp) => return resp,
    };
    match services.network.disable_partner(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => PartnerId::new(v),
        Err(resp) => return resp,
    };
    match services.network.activate_partner(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_partner(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => PartnerId::new(v),
        Err(resp) => return resp,
    };
    match services.network.get_partner(&id).await {
        Ok(partner) => (StatusCode::OK, Json(dto::partner_to_json(partner))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_partners(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::PartnerListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = PartnerFilter {
        code: q.code,
        name: q.name,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .network
        .list_partners(ListPartners {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::partner_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use refdata_core::PageRequest;
use refdata_geography::{
    CityFilter, CityId, CityPatch, CorridorFilter, CorridorId, CorridorPatch, RegionFilter,
    RegionId, RegionPatch, SectorFilter, SectorId, SectorPatch,
};
use refdata_registry::geography::{
    CreateCity, CreateCorridor, CreateRegion, CreateSector, ListCities, ListCorridors,
    ListRegions, ListSectors, PatchCity, PatchCorridor, PatchRegion, PatchSector, UpdateCity,
    UpdateCorridor, UpdateRegion, UpdateSector,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .nest("/regions", regions())
        .nest("/cities", cities())
        .nest("/sectors", sectors())
        .nest("/corridors", corridors())
}

fn regions() -> Router {
    Router::new()
        .route("/", post(create_region).get(list_regions))
        .route(
            "/:id",
            get(get_region).put(update_region).patch(patch_region).delete(disable_region),
        )
        .route("/:id/activate", post(activate_region))
}

fn cities() -> Router {
    Router::new()
        .route("/", post(create_city).get(list_cities))
        .route(
            "/:id",
            get(get_city).put(update_city).patch(patch_city).delete(disable_city),
        )
        .route("/:id/activate", post(activate_city))
}

fn sectors() -> Router {
    Router::new()
        .route("/", post(create_sector).get(list_sectors))
        .route(
            "/:id",
            get(get_sector).put(update_sector).patch(patch_sector).delete(disable_sector),
        )
        .route("/:id/activate", post(activate_sector))
}

fn corridors() -> Router {
    Router::new()
        .route("/", post(create_corridor).get(list_corridors))
        .route(
            "/:id",
            get(get_corridor)
                .put(update_corridor)
                .patch(patch_corridor)
                .delete(disable_corridor),
        )
        .route("/:id/activate", post(activate_corridor))
}

fn page_request(
    page_number: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, axum::response::Response> {
    PageRequest::new(page_number.unwrap_or(1), page_size.unwrap_or(20))
        .map_err(errors::domain_error_to_response)
}

// --- Region ---

async fn create_region(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateRegionRequest>,
) -> axum::response::Response {
    match services
        .geography
        .create_region(CreateRegion {
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_region(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateRegionRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .update_region(UpdateRegion {
            id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_region(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchRegionRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    let patch = RegionPatch {
        code: body.code,
        name: body.name,
    };
    match services.geography.patch_region(PatchRegion { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_region(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.disable_region(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_region(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.activate_region(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_region(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.get_region(&id).await {
        Ok(region) => (StatusCode::OK, Json(dto::region_to_json(region))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_regions(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::RegionListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = RegionFilter {
        code: q.code,
        name: q.name,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .geography
        .list_regions(ListRegions {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::region_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- City ---

async fn create_city(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCityRequest>,
) -> axum::response::Response {
    let region_id = match errors::parse_id(&body.region_id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .create_city(CreateCity {
            region_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_city(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCityRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    let region_id = match errors::parse_id(&body.region_id) {
        Ok(v) => RegionId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .update_city(UpdateCity {
            id,
            region_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_city(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchCityRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    let region_id = match errors::parse_opt_id(body.region_id.as_deref()) {
        Ok(v) => v.map(RegionId::new),
        Err(resp) => return resp,
    };
    let patch = CityPatch {
        region_id,
        code: body.code,
        name: body.name,
    };
    match services.geography.patch_city(PatchCity { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_city(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.disable_city(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_city(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.activate_city(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_city(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.get_city(&id).await {
        Ok(city) => (StatusCode::OK, Json(dto::city_to_json(city))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_cities(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::CityListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let region_id = match errors::parse_opt_id(q.region_id.as_deref()) {
        Ok(v) => v.map(RegionId::new),
        Err(resp) => return resp,
    };
    let filter = CityFilter {
        code: q.code,
        name: q.name,
        region_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .geography
        .list_cities(ListCities {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::city_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Sector ---

async fn create_sector(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateSectorRequest>,
) -> axum::response::Response {
    let city_id = match errors::parse_id(&body.city_id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .create_sector(CreateSector {
            city_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_sector(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateSectorRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => SectorId::new(v),
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_id(&body.city_id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .update_sector(UpdateSector {
            id,
            city_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_sector(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchSectorRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => SectorId::new(v),
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_opt_id(body.city_id.as_deref()) {
        Ok(v) => v.map(CityId::new),
        Err(resp) => return resp,
    };
    let patch = SectorPatch {
        city_id,
        code: body.code,
        name: body.name,
    };
    match services.geography.patch_sector(PatchSector { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_sector(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => SectorId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.disable_sector(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_sector(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => SectorId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.activate_sector(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_sector(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => SectorId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.get_sector(&id).await {
        Ok(sector) => (StatusCode::OK, Json(dto::sector_to_json(sector))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_sectors(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::SectorListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_opt_id(q.city_id.as_deref()) {
        Ok(v) => v.map(CityId::new),
        Err(resp) => return resp,
    };
    let filter = SectorFilter {
        code: q.code,
        name: q.name,
        city_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .geography
        .list_sectors(ListSectors {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::sector_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Corridor ---

async fn create_corridor(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCorridorRequest>,
) -> axum::response::Response {
    let city_id = match errors::parse_id(&body.city_id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .create_corridor(CreateCorridor {
            city_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_corridor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCorridorRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CorridorId::new(v),
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_id(&body.city_id) {
        Ok(v) => CityId::new(v),
        Err(resp) => return resp,
    };
    match services
        .geography
        .update_corridor(UpdateCorridor {
            id,
            city_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_corridor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchCorridorRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CorridorId::new(v),
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_opt_id(body.city_id.as_deref()) {
        Ok(v) => v.map(CityId::new),
        Err(resp) => return resp,
    };
    let patch = CorridorPatch {
        city_id,
        code: body.code,
        name: body.name,
    };
    match services
        .geography
        .patch_corridor(PatchCorridor { id, patch })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_corridor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CorridorId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.disable_corridor(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_corridor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CorridorId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.activate_corridor(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_corridor(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CorridorId::new(v),
        Err(resp) => return resp,
    };
    match services.geography.get_corridor(&id).await {
        Ok(corridor) => (StatusCode::OK, Json(dto::corridor_to_json(corridor))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_corridors(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::CorridorListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let city_id = match errors::parse_opt_id(q.city_id.as_deref()) {
        Ok(v) => v.map(CityId::new),
        Err(resp) => return resp,
    };
    let filter = CorridorFilter {
        code: q.code,
        name: q.name,
        city_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .geography
        .list_corridors(ListCorridors {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::corridor_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

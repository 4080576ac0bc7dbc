use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use refdata_catalog::{
    ProductFilter, ProductId, ProductPatch, ServiceFilter, ServiceId, ServicePatch, TierFilter,
    TierId, TierPatch,
};
use refdata_core::{Money, PageRequest};
use refdata_registry::catalog::{
    CreateProduct, CreateService, CreateTier, ListProducts, ListServices, ListTiers,
    PatchProduct, PatchService, PatchTier, UpdateProduct, UpdateService, UpdateTier,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .nest("/products", products())
        .nest("/services", services_routes())
        .nest("/tiers", tiers())
}

fn products() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route(
            "/:id",
            get(get_product)
                .put(update_product)
                .patch(patch_product)
                .delete(disable_product),
        )
        .route("/:id/activate", post(activate_product))
}

fn services_routes() -> Router {
    Router::new()
        .route("/", post(create_service).get(list_services))
        .route(
            "/:id",
            get(get_service)
                .put(update_service)
                .patch(patch_service)
                .delete(disable_service),
        )
        .route("/:id/activate", post(activate_service))
}

fn tiers() -> Router {
    Router::new()
        .route("/", post(create_tier).get(list_tiers))
        .route(
            "/:id",
            get(get_tier).put(update_tier).patch(patch_tier).delete(disable_tier),
        )
        .route("/:id/activate", post(activate_tier))
}

fn page_request(
    page_number: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, axum::response::Response> {
    PageRequest::new(page_number.unwrap_or(1), page_size.unwrap_or(20))
        .map_err(errors::domain_error_to_response)
}

fn to_money(req: dto::MoneyRequest) -> Result<Money, axum::response::Response> {
    Money::new(req.amount_minor, req.currency).map_err(errors::domain_error_to_response)
}

// --- Product ---

async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    match services
        .catalog
        .create_product(CreateProduct {
            code: body.code,
            name: body.name,
            description: body.description,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    match services
        .catalog
        .update_product(UpdateProduct {
            id,
            code: body.code,
            name: body.name,
            description: body.description,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchProductRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    let patch = ProductPatch {
        code: body.code,
        name: body.name,
        description: body.description,
    };
    match services.catalog.patch_product(PatchProduct { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.disable_product(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.activate_product(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.get_product(&id).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::ProductListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = ProductFilter {
        code: q.code,
        name: q.name,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .catalog
        .list_products(ListProducts {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::product_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Service ---

async fn create_service(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateServiceRequest>,
) -> axum::response::Response {
    let product_id = match errors::parse_id(&body.product_id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    match services
        .catalog
        .create_service(CreateService {
            product_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateServiceRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ServiceId::new(v),
        Err(resp) => return resp,
    };
    let product_id = match errors::parse_id(&body.product_id) {
        Ok(v) => ProductId::new(v),
        Err(resp) => return resp,
    };
    match services
        .catalog
        .update_service(UpdateService {
            id,
            product_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchServiceRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ServiceId::new(v),
        Err(resp) => return resp,
    };
    let product_id = match errors::parse_opt_id(body.product_id.as_deref()) {
        Ok(v) => v.map(ProductId::new),
        Err(resp) => return resp,
    };
    let patch = ServicePatch {
        product_id,
        code: body.code,
        name: body.name,
    };
    match services.catalog.patch_service(PatchService { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ServiceId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.disable_service(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ServiceId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.activate_service(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_service(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => ServiceId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.get_service(&id).await {
        Ok(service) => (StatusCode::OK, Json(dto::service_to_json(service))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_services(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::ServiceListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let product_id = match errors::parse_opt_id(q.product_id.as_deref()) {
        Ok(v) => v.map(ProductId::new),
        Err(resp) => return resp,
    };
    let filter = ServiceFilter {
        code: q.code,
        name: q.name,
        product_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .catalog
        .list_services(ListServices {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::service_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Tier ---

async fn create_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateTierRequest>,
) -> axum::response::Response {
    let floor = match to_money(body.floor) {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    let ceiling = match to_money(body.ceiling) {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    match services
        .catalog
        .create_tier(CreateTier {
            code: body.code,
            name: body.name,
            floor,
            ceiling,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateTierRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    let floor = match to_money(body.floor) {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    let ceiling = match to_money(body.ceiling) {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    match services
        .catalog
        .update_tier(UpdateTier {
            id,
            code: body.code,
            name: body.name,
            floor,
            ceiling,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchTierRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    let floor = match body.floor.map(to_money).transpose() {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    let ceiling = match body.ceiling.map(to_money).transpose() {
        Ok(m) => m,
        Err(resp) => return resp,
    };
    let patch = TierPatch {
        code: body.code,
        name: body.name,
        floor,
        ceiling,
    };
    match services.catalog.patch_tier(PatchTier { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.disable_tier(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.activate_tier(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_tier(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TierId::new(v),
        Err(resp) => return resp,
    };
    match services.catalog.get_tier(&id).await {
        Ok(tier) => (StatusCode::OK, Json(dto::tier_to_json(tier))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_tiers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::TierListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = TierFilter {
        code: q.code,
        name: q.name,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .catalog
        .list_tiers(ListTiers {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::tier_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

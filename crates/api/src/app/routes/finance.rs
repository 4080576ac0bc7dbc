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
use refdata_finance::{
    BankFilter, BankId, BankPatch, CountryFilter, CountryId, CountryPatch, CurrencyFilter,
    CurrencyId, CurrencyPatch, TaxFilter, TaxId, TaxPatch,
};
use refdata_registry::finance::{
    CreateBank, CreateCountry, CreateCurrency, CreateTax, ListBanks, ListCountries,
    ListCurrencies, ListTaxes, PatchBank, PatchCountry, PatchCurrency, PatchTax, UpdateBank,
    UpdateCountry, UpdateCurrency, UpdateTax,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .nest("/banks", banks())
        .nest("/currencies", currencies())
        .nest("/countries", countries())
        .nest("/taxes", taxes())
}

fn banks() -> Router {
    Router::new()
        .route("/", post(create_bank).get(list_banks))
        .route(
            "/:id",
            get(get_bank).put(update_bank).patch(patch_bank).delete(disable_bank),
        )
        .route("/:id/activate", post(activate_bank))
}

fn currencies() -> Router {
    Router::new()
        .route("/", post(create_currency).get(list_currencies))
        .route(
            "/:id",
            get(get_currency)
                .put(update_currency)
                .patch(patch_currency)
                .delete(disable_currency),
        )
        .route("/:id/activate", post(activate_currency))
}

fn countries() -> Router {
    Router::new()
        .route("/", post(create_country).get(list_countries))
        .route(
            "/:id",
            get(get_country)
                .put(update_country)
                .patch(patch_country)
                .delete(disable_country),
        )
        .route("/:id/activate", post(activate_country))
}

fn taxes() -> Router {
    Router::new()
        .route("/", post(create_tax).get(list_taxes))
        .route(
            "/:id",
            get(get_tax).put(update_tax).patch(patch_tax).delete(disable_tax),
        )
        .route("/:id/activate", post(activate_tax))
}

fn page_request(
    page_number: Option<u32>,
    page_size: Option<u32>,
) -> Result<PageRequest, axum::response::Response> {
    PageRequest::new(page_number.unwrap_or(1), page_size.unwrap_or(20))
        .map_err(errors::domain_error_to_response)
}

// --- Bank ---

async fn create_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateBankRequest>,
) -> axum::response::Response {
    match services
        .finance
        .create_bank(CreateBank {
            code: body.code,
            name: body.name,
            swift: body.swift,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateBankRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => BankId::new(v),
        Err(resp) => return resp,
    };
    match services
        .finance
        .update_bank(UpdateBank {
            id,
            code: body.code,
            name: body.name,
            swift: body.swift,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchBankRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => BankId::new(v),
        Err(resp) => return resp,
    };
    let patch = BankPatch {
        code: body.code,
        name: body.name,
        swift: body.swift,
    };
    match services.finance.patch_bank(PatchBank { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => BankId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.disable_bank(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => BankId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.activate_bank(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_bank(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => BankId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.get_bank(&id).await {
        Ok(bank) => (StatusCode::OK, Json(dto::bank_to_json(bank))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_banks(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::BankListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = BankFilter {
        code: q.code,
        name: q.name,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .finance
        .list_banks(ListBanks {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::bank_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Currency ---

async fn create_currency(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCurrencyRequest>,
) -> axum::response::Response {
    match services
        .finance
        .create_currency(CreateCurrency {
            code: body.code,
            name: body.name,
            decimals: body.decimals,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_currency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCurrencyRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    match services
        .finance
        .update_currency(UpdateCurrency {
            id,
            code: body.code,
            name: body.name,
            decimals: body.decimals,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_currency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchCurrencyRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    let patch = CurrencyPatch {
        code: body.code,
        name: body.name,
        decimals: body.decimals,
    };
    match services.finance.patch_currency(PatchCurrency { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_currency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.disable_currency(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_currency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.activate_currency(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_currency(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.get_currency(&id).await {
        Ok(currency) => (StatusCode::OK, Json(dto::currency_to_json(currency))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_currencies(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::CurrencyListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = CurrencyFilter {
        code: q.code,
        name: q.name,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .finance
        .list_currencies(ListCurrencies {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::currency_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Country ---

async fn create_country(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCountryRequest>,
) -> axum::response::Response {
    let currency_id = match errors::parse_id(&body.currency_id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    match services
        .finance
        .create_country(CreateCountry {
            currency_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_country(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCountryRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CountryId::new(v),
        Err(resp) => return resp,
    };
    let currency_id = match errors::parse_id(&body.currency_id) {
        Ok(v) => CurrencyId::new(v),
        Err(resp) => return resp,
    };
    match services
        .finance
        .update_country(UpdateCountry {
            id,
            currency_id,
            code: body.code,
            name: body.name,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_country(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchCountryRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CountryId::new(v),
        Err(resp) => return resp,
    };
    let currency_id = match errors::parse_opt_id(body.currency_id.as_deref()) {
        Ok(v) => v.map(CurrencyId::new),
        Err(resp) => return resp,
    };
    let patch = CountryPatch {
        currency_id,
        code: body.code,
        name: body.name,
    };
    match services.finance.patch_country(PatchCountry { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_country(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CountryId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.disable_country(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_country(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CountryId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.activate_country(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_country(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => CountryId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.get_country(&id).await {
        Ok(country) => (StatusCode::OK, Json(dto::country_to_json(country))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_countries(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::CountryListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let currency_id = match errors::parse_opt_id(q.currency_id.as_deref()) {
        Ok(v) => v.map(CurrencyId::new),
        Err(resp) => return resp,
    };
    let filter = CountryFilter {
        code: q.code,
        name: q.name,
        currency_id,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .finance
        .list_countries(ListCountries {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::country_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

// --- Tax ---

async fn create_tax(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateTaxRequest>,
) -> axum::response::Response {
    match services
        .finance
        .create_tax(CreateTax {
            code: body.code,
            code_en: body.code_en,
            code_ar: body.code_ar,
            description: body.description,
            rate_bps: body.rate_bps,
        })
        .await
    {
        Ok(id) => (StatusCode::CREATED, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn update_tax(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateTaxRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TaxId::new(v),
        Err(resp) => return resp,
    };
    match services
        .finance
        .update_tax(UpdateTax {
            id,
            code: body.code,
            code_en: body.code_en,
            code_ar: body.code_ar,
            description: body.description,
            rate_bps: body.rate_bps,
        })
        .await
    {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn patch_tax(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::PatchTaxRequest>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TaxId::new(v),
        Err(resp) => return resp,
    };
    let patch = TaxPatch {
        code: body.code,
        code_en: body.code_en,
        code_ar: body.code_ar,
        description: body.description,
        rate_bps: body.rate_bps,
    };
    match services.finance.patch_tax(PatchTax { id, patch }).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id.to_string() }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn disable_tax(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TaxId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.disable_tax(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn activate_tax(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TaxId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.activate_tax(id).await {
        Ok(ok) => (StatusCode::OK, Json(json!({ "success": ok }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn get_tax(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_id(&id) {
        Ok(v) => TaxId::new(v),
        Err(resp) => return resp,
    };
    match services.finance.get_tax(&id).await {
        Ok(tax) => (StatusCode::OK, Json(dto::tax_to_json(tax))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_taxes(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::TaxListQuery>,
) -> axum::response::Response {
    let page = match page_request(q.page_number, q.page_size) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let filter = TaxFilter {
        code: q.code,
        description: q.description,
        enabled: q.enabled.or(Some(true)),
    };
    match services
        .finance
        .list_taxes(ListTaxes {
            filter,
            page: Some(page),
        })
        .await
    {
        Ok(page) => {
            (StatusCode::OK, Json(dto::page_to_json(page, dto::tax_to_json))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

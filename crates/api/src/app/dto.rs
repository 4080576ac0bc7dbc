//! Request DTOs and JSON mapping helpers.

use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use refdata_catalog::{Product, Service, Tier};
use refdata_core::{Entity, Page, Referential};
use refdata_finance::{Bank, Country, Currency, Tax};
use refdata_geography::{City, Corridor, Region, Sector};
use refdata_network::{Agency, AgencyTier, Partner};

/// Distinguishes an absent patch field (keep) from an explicit `null`
/// (clear): absent deserializes to `None` via `#[serde(default)]`, a present
/// value — `null` included — lands in `Some(..)`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// -------------------------
// Shared request fragments
// -------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MoneyRequest {
    pub amount_minor: i64,
    pub currency: String,
}

// -------------------------
// Geography requests
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateRegionRequest {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRegionRequest {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchRegionRequest {
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegionListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCityRequest {
    pub region_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCityRequest {
    pub region_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchCityRequest {
    pub region_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CityListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub region_id: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSectorRequest {
    pub city_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSectorRequest {
    pub city_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchSectorRequest {
    pub city_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SectorListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub city_id: Option<String>,
    pub enabled: Option<bool>,
}

pub type CreateCorridorRequest = CreateSectorRequest;
pub type UpdateCorridorRequest = UpdateSectorRequest;
pub type PatchCorridorRequest = PatchSectorRequest;
pub type CorridorListQuery = SectorListQuery;

// -------------------------
// Finance requests
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateBankRequest {
    pub code: String,
    pub name: String,
    pub swift: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBankRequest {
    pub code: String,
    pub name: String,
    pub swift: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchBankRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub swift: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct BankListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCurrencyRequest {
    pub code: String,
    pub name: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCurrencyRequest {
    pub code: String,
    pub name: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
pub struct PatchCurrencyRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub decimals: Option<u8>,
}

pub type CurrencyListQuery = BankListQuery;

#[derive(Debug, Deserialize)]
pub struct CreateCountryRequest {
    pub currency_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCountryRequest {
    pub currency_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchCountryRequest {
    pub currency_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountryListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub currency_id: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaxRequest {
    pub code: String,
    pub code_en: String,
    pub code_ar: String,
    pub description: Option<String>,
    pub rate_bps: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaxRequest {
    pub code: String,
    pub code_en: String,
    pub code_ar: String,
    pub description: Option<String>,
    pub rate_bps: u32,
}

#[derive(Debug, Deserialize)]
pub struct PatchTaxRequest {
    pub code: Option<String>,
    pub code_en: Option<String>,
    pub code_ar: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub rate_bps: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TaxListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

// -------------------------
// Catalog requests
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchProductRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

pub type ProductListQuery = BankListQuery;

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub product_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub product_id: String,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PatchServiceRequest {
    pub product_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub product_id: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTierRequest {
    pub code: String,
    pub name: String,
    pub floor: MoneyRequest,
    pub ceiling: MoneyRequest,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTierRequest {
    pub code: String,
    pub name: String,
    pub floor: MoneyRequest,
    pub ceiling: MoneyRequest,
}

#[derive(Debug, Deserialize)]
pub struct PatchTierRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub floor: Option<MoneyRequest>,
    pub ceiling: Option<MoneyRequest>,
}

pub type TierListQuery = BankListQuery;

// -------------------------
// Network requests
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateAgencyRequest {
    pub city_id: String,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgencyRequest {
    pub city_id: String,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchAgencyRequest {
    pub city_id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AgencyListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub city_id: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAgencyTierRequest {
    pub agency_id: String,
    pub tier_id: String,
    pub code: String,
    pub commission_bps: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAgencyTierRequest {
    pub agency_id: String,
    pub tier_id: String,
    pub code: String,
    pub commission_bps: u32,
}

#[derive(Debug, Deserialize)]
pub struct PatchAgencyTierRequest {
    pub agency_id: Option<String>,
    pub tier_id: Option<String>,
    pub code: Option<String>,
    pub commission_bps: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AgencyTierListQuery {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub code: Option<String>,
    pub agency_id: Option<String>,
    pub tier_id: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    pub code: String,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartnerRequest {
    pub code: String,
    pub name: String,
    pub contact_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchPartnerRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_email: Option<Option<String>>,
}

pub type PartnerListQuery = BankListQuery;

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn page_to_json<T>(page: Page<T>, to_json: impl FnMut(T) -> Value) -> Value {
    let page = page.map(to_json);
    json!({
        "items": page.items,
        "total_count": page.total_count,
        "page_number": page.page_number,
        "page_size": page.page_size,
    })
}

pub fn region_to_json(r: Region) -> Value {
    json!({
        "id": r.id().to_string(),
        "code": r.code(),
        "name": r.name(),
        "enabled": r.is_enabled(),
    })
}

pub fn city_to_json(c: City) -> Value {
    json!({
        "id": c.id().to_string(),
        "region_id": c.region_id().to_string(),
        "code": c.code(),
        "name": c.name(),
        "enabled": c.is_enabled(),
    })
}

pub fn sector_to_json(s: Sector) -> Value {
    json!({
        "id": s.id().to_string(),
        "city_id": s.city_id().to_string(),
        "code": s.code(),
        "name": s.name(),
        "enabled": s.is_enabled(),
    })
}

pub fn corridor_to_json(c: Corridor) -> Value {
    json!({
        "id": c.id().to_string(),
        "city_id": c.city_id().to_string(),
        "code": c.code(),
        "name": c.name(),
        "enabled": c.is_enabled(),
    })
}

pub fn bank_to_json(b: Bank) -> Value {
    json!({
        "id": b.id().to_string(),
        "code": b.code(),
        "name": b.name(),
        "swift": b.swift(),
        "enabled": b.is_enabled(),
    })
}

pub fn currency_to_json(c: Currency) -> Value {
    json!({
        "id": c.id().to_string(),
        "code": c.code(),
        "name": c.name(),
        "decimals": c.decimals(),
        "enabled": c.is_enabled(),
    })
}

pub fn country_to_json(c: Country) -> Value {
    json!({
        "id": c.id().to_string(),
        "currency_id": c.currency_id().to_string(),
        "code": c.code(),
        "name": c.name(),
        "enabled": c.is_enabled(),
    })
}

pub fn tax_to_json(t: Tax) -> Value {
    json!({
        "id": t.id().to_string(),
        "code": t.code(),
        "code_en": t.code_en(),
        "code_ar": t.code_ar(),
        "description": t.description(),
        "rate_bps": t.rate_bps(),
        "enabled": t.is_enabled(),
    })
}

pub fn product_to_json(p: Product) -> Value {
    json!({
        "id": p.id().to_string(),
        "code": p.code(),
        "name": p.name(),
        "description": p.description(),
        "enabled": p.is_enabled(),
    })
}

pub fn service_to_json(s: Service) -> Value {
    json!({
        "id": s.id().to_string(),
        "product_id": s.product_id().to_string(),
        "code": s.code(),
        "name": s.name(),
        "enabled": s.is_enabled(),
    })
}

pub fn tier_to_json(t: Tier) -> Value {
    json!({
        "id": t.id().to_string(),
        "code": t.code(),
        "name": t.name(),
        "floor": { "amount_minor": t.floor().amount_minor(), "currency": t.floor().currency() },
        "ceiling": { "amount_minor": t.ceiling().amount_minor(), "currency": t.ceiling().currency() },
        "enabled": t.is_enabled(),
    })
}

pub fn agency_to_json(a: Agency) -> Value {
    json!({
        "id": a.id().to_string(),
        "city_id": a.city_id().to_string(),
        "code": a.code(),
        "name": a.name(),
        "address": a.address(),
        "enabled": a.is_enabled(),
    })
}

pub fn agency_tier_to_json(l: AgencyTier) -> Value {
    json!({
        "id": l.id().to_string(),
        "agency_id": l.agency_id().to_string(),
        "tier_id": l.tier_id().to_string(),
        "code": l.code(),
        "commission_bps": l.commission_bps(),
        "enabled": l.is_enabled(),
    })
}

pub fn partner_to_json(p: Partner) -> Value {
    json!({
        "id": p.id().to_string(),
        "code": p.code(),
        "name": p.name(),
        "contact_email": p.contact_email(),
        "enabled": p.is_enabled(),
    })
}

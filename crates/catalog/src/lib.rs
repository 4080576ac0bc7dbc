//! `refdata-catalog` — product/service referential records.

pub mod product;
pub mod service;
pub mod tier;

pub use product::{Product, ProductFilter, ProductId, ProductPatch};
pub use service::{Service, ServiceFilter, ServiceId, ServicePatch};
pub use tier::{Tier, TierFilter, TierId, TierPatch};

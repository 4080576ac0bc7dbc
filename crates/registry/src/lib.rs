//! `refdata-registry` — command/query handlers over the referential.
//!
//! One module per domain area; every handler follows the same protocol:
//! validate the command shape (collecting all broken rules) → load the
//! target → run the integrity checks, sequentially and short-circuiting →
//! invoke the aggregate behavior → one persist (`save`) → cache coherency →
//! publish the drained lifecycle events. Queries skip the middle steps.

pub mod catalog;
pub mod finance;
pub mod geography;
pub mod network;
mod support;

pub use catalog::CatalogRegistry;
pub use finance::FinanceRegistry;
pub use geography::GeographyRegistry;
pub use network::NetworkRegistry;

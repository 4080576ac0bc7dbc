//! HTTP routes, one file per domain area.

use axum::Router;

pub mod catalog;
pub mod finance;
pub mod geography;
pub mod network;
pub mod system;

/// Every collection under `/api`.
pub fn router() -> Router {
    Router::new()
        .merge(geography::router())
        .merge(finance::router())
        .merge(catalog::router())
        .merge(network::router())
}

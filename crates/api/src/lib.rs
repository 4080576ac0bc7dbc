//! `refdata-api` — HTTP boundary for the referential service.

pub mod app;

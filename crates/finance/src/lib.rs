//! `refdata-finance` — monetary referential records.

pub mod bank;
pub mod country;
pub mod currency;
pub mod tax;

pub use bank::{Bank, BankFilter, BankId, BankPatch};
pub use country::{Country, CountryFilter, CountryId, CountryPatch};
pub use currency::{Currency, CurrencyFilter, CurrencyId, CurrencyPatch};
pub use tax::{Tax, TaxFilter, TaxId, TaxPatch};

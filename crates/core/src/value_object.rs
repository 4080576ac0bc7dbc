//! Value object trait: equality by value, not identity.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::validate::Violations;

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two instances
/// with the same attributes are interchangeable. To "modify" one, build a new
/// one; construction is the only place validation runs.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A monetary amount in minor units (e.g. cents) with an ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: String,
}

impl Money {
    /// Build a validated amount. Rejects negative amounts and anything that
    /// is not a 3-letter uppercase ASCII currency code.
    pub fn new(amount_minor: i64, currency: impl Into<String>) -> DomainResult<Self> {
        let currency = currency.into();
        let mut rules = Violations::new();
        rules.require(amount_minor >= 0, "amount must not be negative");
        rules.require(
            currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase()),
            "currency must be a 3-letter uppercase ISO code",
        );
        rules.finish()?;
        Ok(Self {
            amount_minor,
            currency,
        })
    }

    pub fn zero(currency: impl Into<String>) -> DomainResult<Self> {
        Self::new(0, currency)
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl ValueObject for Money {}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_equality_is_by_value() {
        let a = Money::new(100, "MAD").unwrap();
        let b = Money::new(100, "MAD").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn money_rejects_bad_currency_and_negative_amount_together() {
        let err = Money::new(-5, "mad").unwrap_err();
        match err {
            DomainError::Validation(rules) => assert_eq!(rules.len(), 2),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn money_accepts_zero() {
        let m = Money::zero("EUR").unwrap();
        assert_eq!(m.amount_minor(), 0);
        assert_eq!(m.currency(), "EUR");
    }
}

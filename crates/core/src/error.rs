//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// integrity rules, conflicts). The HTTP layer maps each variant to a status
/// code; nothing in this layer retries or swallows a failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input shape violated one or more validation rules. Carries every
    /// broken rule, not just the first.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The primary target of an operation does not exist.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Natural-key collision with a different record of the same type.
    #[error("duplicate {resource} key: {key}")]
    DuplicateKey { resource: &'static str, key: String },

    /// A foreign-key field points at a record that does not exist (or is
    /// disabled and therefore cannot take new references).
    #[error("referenced {resource} not found: {id}")]
    ReferenceNotFound { resource: &'static str, id: String },

    /// Disable blocked because live dependents still reference the target.
    #[error("{resource} is still referenced by enabled {dependent} records")]
    ResourceInUse {
        resource: &'static str,
        dependent: &'static str,
    },

    /// An identifier was invalid (nil value, parse failure). A contract
    /// error rather than user input.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Infrastructure failure surfaced through the repository or cache port.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(rules: Vec<String>) -> Self {
        Self::Validation(rules)
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn duplicate_key(resource: &'static str, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            resource,
            key: key.into(),
        }
    }

    pub fn reference_not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn resource_in_use(resource: &'static str, dependent: &'static str) -> Self {
        Self::ResourceInUse {
            resource,
            dependent,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

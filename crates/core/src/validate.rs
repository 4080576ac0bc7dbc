//! Validation-rule collector.
//!
//! Callers report a validation failure with *every* broken rule, not just the
//! first, so this accumulates and only fails at `finish()`.

use crate::error::{DomainError, DomainResult};

/// Accumulates violated validation rules.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `rule` as violated unless `ok` holds.
    pub fn require(&mut self, ok: bool, rule: impl Into<String>) {
        if !ok {
            self.0.push(rule.into());
        }
    }

    /// Convenience for the most common rule: a mandatory non-blank string.
    pub fn require_non_blank(&mut self, value: &str, field: &str) {
        self.require(!value.trim().is_empty(), format!("{field} must not be blank"));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was violated, otherwise every broken rule.
    pub fn finish(self) -> DomainResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_ok_when_all_rules_hold() {
        let mut v = Violations::new();
        v.require(true, "never reported");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn finish_collects_every_broken_rule() {
        let mut v = Violations::new();
        v.require_non_blank("", "code");
        v.require_non_blank("   ", "name");
        v.require(false, "rate must be positive");
        match v.finish().unwrap_err() {
            DomainError::Validation(rules) => {
                assert_eq!(rules.len(), 3);
                assert!(rules[0].contains("code"));
                assert!(rules[1].contains("name"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}

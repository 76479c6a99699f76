//! # Parameter Bags
//!
//! Actions receive their input as a flat JSON object. Before validation it is a
//! plain [`Params`]; after validation it is wrapped in [`ValidatedParams`], which
//! only the validator can construct. A handler signature that takes
//! `ValidatedParams` therefore cannot be reached with unchecked input.

use crate::error::FrameworkError;
use serde_json::{Map, Value};

/// An unvalidated parameter bag (path, query and body merged).
pub type Params = Map<String, Value>;

/// A parameter bag that passed its action's schema.
///
/// Every required field is present and well-typed. Optional fields that were not
/// supplied stay absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedParams(Params);

impl ValidatedParams {
    pub(crate) fn new(params: Params) -> Self {
        Self(params)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns a text field, if present.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns a text field the schema declared as required.
    ///
    /// A miss here means the handler and its schema disagree, which is a bug in
    /// the service definition rather than a client error.
    pub fn require_str(&self, name: &str) -> Result<&str, FrameworkError> {
        self.str(name)
            .ok_or_else(|| {
                FrameworkError::Internal(format!("validated parameter '{name}' missing"))
            })
    }

    /// Consumes the bag and returns the remaining fields without `names`.
    pub fn without(self, names: &[&str]) -> Params {
        let mut params = self.0;
        for name in names {
            params.remove(*name);
        }
        params
    }

    pub fn as_params(&self) -> &Params {
        &self.0
    }

    pub fn into_inner(self) -> Params {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag() -> ValidatedParams {
        let Value::Object(map) = json!({ "id": "a1", "city": "Oslo" }) else {
            unreachable!()
        };
        ValidatedParams::new(map)
    }

    #[test]
    fn test_without_strips_named_fields() {
        let rest = bag().without(&["id"]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.get("city"), Some(&json!("Oslo")));
    }

    #[test]
    fn test_require_str_reports_internal_error() {
        let params = bag();
        assert_eq!(params.require_str("id").unwrap(), "a1");
        assert!(matches!(params.require_str("zip"), Err(FrameworkError::Internal(_))));
    }
}

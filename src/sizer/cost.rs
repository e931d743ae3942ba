//! Per-kind overhead constants of the size estimate.
//!
//! Every structural element of a module costs some bytes of bookkeeping in the metadata tables
//! and heaps beyond its name and payload: a `TypeDef` row, a `MethodDef` row plus its body
//! header, a `Param` row and so on. [`CostModel`] holds one estimate per element kind. The
//! defaults are heuristic row-size estimates, expressed as fixed bytes plus two bytes per
//! heap or table index; they are configuration, not measurements, and can be overridden from
//! a JSON file when calibrating against real modules.
//!
//! # Examples
//!
//! ```rust
//! use dotsizer::sizer::cost::CostModel;
//!
//! let model = CostModel::from_json(r#"{ "method": 24 }"#)?;
//! assert_eq!(model.method, 24);
//! assert_eq!(model.field, CostModel::default().field);
//! # Ok::<(), dotsizer::Error>(())
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Overhead constants in bytes, one per structural element kind.
///
/// Values are signed so that a miscalibrated model can be represented and rejected by
/// [`CostModel::validate`] or, if used anyway, caught by the size tree as a negative cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostModel {
    /// Per type definition
    pub type_def: i64,
    /// Per field, instance or static
    pub field: i64,
    /// Per method or constructor
    pub method: i64,
    /// Per local variable of a method body
    pub local_variable: i64,
    /// Per method parameter, in addition to its name
    pub parameter: i64,
    /// Per implemented interface
    pub interface_impl: i64,
    /// Per event
    pub event: i64,
    /// Per property
    pub property: i64,
    /// Per custom attribute
    pub custom_attribute: i64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            type_def: 4 + 8 * 2,
            field: 2 + 2 * 2,
            method: 8 + 6 * 2,
            local_variable: 4 + 2,
            parameter: 16,
            interface_impl: 2 * 2,
            event: 2 + 2 * 2,
            property: 2 + 2 * 2,
            custom_attribute: 3 * 2,
        }
    }
}

impl CostModel {
    /// A model that charges nothing for bookkeeping, leaving only content-dependent terms
    /// (names, instruction streams, static data) in the estimate.
    #[must_use]
    pub fn content_only() -> Self {
        Self {
            type_def: 0,
            field: 0,
            method: 0,
            local_variable: 0,
            parameter: 0,
            interface_impl: 0,
            event: 0,
            property: 0,
            custom_attribute: 0,
        }
    }

    /// Parses a model from JSON. Missing keys keep their default value.
    ///
    /// # Errors
    /// Returns [`Error::Snapshot`] for malformed JSON or unknown keys, and [`Error::Config`] if
    /// the parsed model fails [`CostModel::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let model: CostModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Reads and parses a model file.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file cannot be read, otherwise see
    /// [`CostModel::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that every constant is non-negative.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first negative constant.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.entries() {
            if value < 0 {
                return Err(Error::Config(format!("{name} overhead is negative ({value})")));
            }
        }
        Ok(())
    }

    /// Returns every constant together with its configuration key.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, i64); 9] {
        [
            ("type_def", self.type_def),
            ("field", self.field),
            ("method", self.method),
            ("local_variable", self.local_variable),
            ("parameter", self.parameter),
            ("interface_impl", self.interface_impl),
            ("event", self.event),
            ("property", self.property),
            ("custom_attribute", self.custom_attribute),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let model = CostModel::default();
        assert_eq!(model.type_def, 20);
        assert_eq!(model.field, 6);
        assert_eq!(model.method, 20);
        assert_eq!(model.local_variable, 6);
        assert_eq!(model.parameter, 16);
        assert_eq!(model.interface_impl, 4);
        assert_eq!(model.event, 6);
        assert_eq!(model.property, 6);
        assert_eq!(model.custom_attribute, 6);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_content_only() {
        let model = CostModel::content_only();
        assert!(model.entries().iter().all(|(_, value)| *value == 0));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let model = CostModel::from_json(r#"{ "type_def": 32, "parameter": 8 }"#).unwrap();
        assert_eq!(model.type_def, 32);
        assert_eq!(model.parameter, 8);
        assert_eq!(model.method, 20);
    }

    #[test]
    fn test_from_json_rejects_negative() {
        match CostModel::from_json(r#"{ "event": -2 }"#) {
            Err(Error::Config(message)) => assert!(message.contains("event")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        assert!(matches!(
            CostModel::from_json(r#"{ "methods": 2 }"#),
            Err(Error::Snapshot(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{ "field": 10 }"#).unwrap();

        assert_eq!(CostModel::from_path(&path).unwrap().field, 10);
        assert!(CostModel::from_path(dir.path().join("missing.json")).is_err());
    }
}

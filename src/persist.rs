//! Model files: input values as JSON
//!
//! Only INPUT nodes are written; derived values recompute on first read after
//! loading. Documents are checked against an embedded JSON Schema before serde
//! sees them, then every id and variant is checked against the model before
//! anything is applied.

use std::collections::BTreeMap;
use std::path::Path;

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{ErrorCategory, RetrofitError};
use crate::model::AircraftModel;
use crate::value::Value;

/// Format tag written into every model file
pub const MODEL_SCHEMA: &str = "h2retrofit/model@0.1";

/// Embedded schema JSON
const SCHEMA_JSON: &str = include_str!("../schemas/model.schema.json");

static VALIDATOR: Lazy<Result<Validator, String>> = Lazy::new(|| {
    let schema: JsonValue = serde_json::from_str(SCHEMA_JSON)
        .map_err(|e| format!("Failed to parse schema JSON: {}", e))?;
    jsonschema::validator_for(&schema).map_err(|e| format!("Failed to compile schema: {}", e))
});

/// On-disk form of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub schema: String,
    pub inputs: BTreeMap<String, Value>,
}

impl ModelFile {
    /// Snapshot of the model's inputs
    pub fn from_model(model: &AircraftModel) -> Self {
        Self {
            schema: MODEL_SCHEMA.to_string(),
            inputs: model.inputs(),
        }
    }

    /// Parse and schema-check a document
    pub fn from_json(json: &str) -> Result<Self, RetrofitError> {
        let document: JsonValue = serde_json::from_str(json)?;
        validate_document(&document)?;
        serde_json::from_value(document).map_err(|e| RetrofitError::ModelFile {
            details: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, RetrofitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply every input to `model`, or none of them
    pub fn apply(self, model: &mut AircraftModel) -> Result<(), RetrofitError> {
        let count = self.inputs.len();
        model.apply_inputs(self.inputs).map_err(|e| match e.category() {
            ErrorCategory::GraphStructure | ErrorCategory::InputValidation => {
                RetrofitError::ModelFile {
                    details: e.to_string(),
                }
            }
            _ => e,
        })?;
        debug!(inputs = count, "model file applied");
        Ok(())
    }
}

/// Check a parsed document against the embedded schema
pub fn validate_document(document: &JsonValue) -> Result<(), RetrofitError> {
    let validator = VALIDATOR.as_ref().map_err(|e| RetrofitError::ModelFile {
        details: e.clone(),
    })?;

    let errors: Vec<String> = validator
        .iter_errors(document)
        .map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", path, e)
            }
        })
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RetrofitError::ModelFile {
            details: errors.join("; "),
        })
    }
}

/// Write the model's inputs to `path`
pub fn save(model: &AircraftModel, path: impl AsRef<Path>) -> Result<(), RetrofitError> {
    let path = path.as_ref();
    let json = ModelFile::from_model(model).to_json()?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "model saved");
    Ok(())
}

/// Build a baseline model and apply the inputs stored at `path`
pub fn load(path: impl AsRef<Path>, config: ModelConfig) -> Result<AircraftModel, RetrofitError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let file = ModelFile::from_json(&json)?;
    let mut model = AircraftModel::new(config)?;
    file.apply(&mut model)?;
    info!(path = %path.display(), "model loaded");
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids;
    use serde_json::json;

    #[test]
    fn saved_file_is_schema_valid() {
        let model = AircraftModel::baseline().unwrap();
        let json = ModelFile::from_model(&model).to_json().unwrap();
        let document: JsonValue = serde_json::from_str(&json).unwrap();
        validate_document(&document).unwrap();
        assert_eq!(document["schema"], MODEL_SCHEMA);
        assert_eq!(document["inputs"]["tank.count"], json!({"count": 1}));
    }

    #[test]
    fn wrong_schema_tag_is_rejected() {
        let err = ModelFile::from_json(r#"{"schema": "other@1", "inputs": {}}"#).unwrap_err();
        assert!(matches!(err, RetrofitError::ModelFile { .. }));
    }

    #[test]
    fn derived_variant_is_rejected_by_schema() {
        let doc = json!({
            "schema": MODEL_SCHEMA,
            "inputs": {"wing.mac": {"mac": {"length": 4.0}}}
        });
        assert!(validate_document(&doc).is_err());
    }

    #[test]
    fn unknown_id_rejects_whole_file() {
        let mut model = AircraftModel::baseline().unwrap();
        let before = model.inputs();
        let file = ModelFile::from_json(
            &json!({
                "schema": MODEL_SCHEMA,
                "inputs": {
                    "fuselage.length": {"scalar": 30.0},
                    "fuselage.width": {"scalar": 4.0}
                }
            })
            .to_string(),
        )
        .unwrap();
        let err = file.apply(&mut model).unwrap_err();
        assert!(matches!(err, RetrofitError::ModelFile { .. }));
        assert!(err.to_string().contains("fuselage.width"));
        assert_eq!(model.inputs(), before);
    }

    #[test]
    fn derived_id_is_rejected() {
        let mut model = AircraftModel::baseline().unwrap();
        let file = ModelFile::from_json(
            &json!({
                "schema": MODEL_SCHEMA,
                "inputs": {"wing.lemac_x": {"scalar": 1.0}}
            })
            .to_string(),
        )
        .unwrap();
        assert!(file.apply(&mut model).is_err());
    }

    #[test]
    fn variant_mismatch_is_rejected() {
        let mut model = AircraftModel::baseline().unwrap();
        let file = ModelFile::from_json(
            &json!({
                "schema": MODEL_SCHEMA,
                "inputs": {(ids::TANK_COUNT): {"scalar": 2.0}}
            })
            .to_string(),
        )
        .unwrap();
        let err = file.apply(&mut model).unwrap_err();
        assert!(err.to_string().contains("expects a count value"));
    }
}

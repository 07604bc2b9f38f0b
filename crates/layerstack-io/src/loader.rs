use crate::registry::LayerRegistry;
use crate::spec::{LayerEntry, StackSpec};
use layerstack_core::{LayerError, LayerResult, Value};
use layerstack_nn::LayerStack;
use std::fs;
use std::path::Path;

/// Read a stack description from JSON.
///
/// Two forms are accepted: an object whose `layers` member is an array (the
/// composite form, optionally carrying a `name`), or a bare array of entries
/// (the sequence form). Anything else is rejected with
/// [`LayerError::InvalidInputKind`].
pub fn spec_from_value(value: &Value) -> LayerResult<StackSpec> {
    match value {
        Value::Object(map) => match map.get("layers") {
            Some(Value::Array(_)) => serde_json::from_value(value.clone()).map_err(invalid_config),
            Some(other) => Err(LayerError::InvalidInputKind {
                found: format!("object whose `layers` is {}", json_kind(other)),
            }),
            None => Err(LayerError::InvalidInputKind {
                found: "object without `layers`".to_string(),
            }),
        },
        Value::Array(_) => {
            let layers: Vec<LayerEntry> =
                serde_json::from_value(value.clone()).map_err(invalid_config)?;
            Ok(StackSpec { name: None, layers })
        }
        other => Err(LayerError::InvalidInputKind {
            found: json_kind(other).to_string(),
        }),
    }
}

/// Build a stack from a JSON description, see [`spec_from_value`].
pub fn stack_from_value<T>(value: &Value, registry: &LayerRegistry<T>) -> LayerResult<LayerStack<T>> {
    registry.build_stack(&spec_from_value(value)?)
}

/// Load a stack description from a JSON file.
pub fn load_spec(path: impl AsRef<Path>) -> LayerResult<StackSpec> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)
        .map_err(|e| LayerError::Io(format!("{}: {}", path.display(), e)))?;
    let value: Value = serde_json::from_str(&json).map_err(invalid_config)?;
    spec_from_value(&value)
}

/// Load and build a stack from a JSON file.
pub fn load_stack<T>(path: impl AsRef<Path>, registry: &LayerRegistry<T>) -> LayerResult<LayerStack<T>> {
    let spec = load_spec(path)?;
    tracing::info!(name = spec.name.as_deref(), entries = spec.layers.len(), "loaded stack description");
    registry.build_stack(&spec)
}

/// Save a stack description to a JSON file.
pub fn save_spec(spec: &StackSpec, path: impl AsRef<Path>) -> LayerResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(spec).map_err(invalid_config)?;
    fs::write(path, json).map_err(|e| LayerError::Io(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

fn invalid_config(e: serde_json::Error) -> LayerError {
    LayerError::InvalidConfig(format!("stack description: {}", e))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use layerstack_core::{BatchOptions, LayerConfig, Value};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Keys a repeat entry may carry, batch options included.
const REPEAT_KEYS: [&str; 7] = [
    "class_name",
    "args",
    "config",
    "name",
    "name_start_index",
    "initial_only_key",
    "strict_lengths",
];

/// One layer: `{"class_name": "Dense", "args": [16], "config": {"activation": "relu"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "LayerConfig::is_empty")]
    pub config: LayerConfig,
}

impl LayerSpec {
    pub fn new(class_name: impl Into<String>) -> Self {
        LayerSpec {
            class_name: class_name.into(),
            args: Vec::new(),
            config: LayerConfig::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn config(mut self, config: LayerConfig) -> Self {
        self.config = config;
        self
    }
}

/// Several layers of one class, one per element of `args[0]`.
///
/// Batch options sit next to the other fields:
/// `{"class_name": "LSTM", "args": [[1, 2]], "name": "rnn", "config": {"input_shape": [3, 4]}}`.
/// Any other key is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct RepeatSpec {
    pub class_name: String,
    #[serde(default)]
    pub args: Vec<Vec<Value>>,
    #[serde(default)]
    pub config: LayerConfig,
    #[serde(flatten)]
    pub options: BatchOptions,
}

// `deny_unknown_fields` does not combine with `flatten`, so keys are checked
// against `REPEAT_KEYS` before the fields are read.
#[derive(Deserialize)]
struct RepeatFields {
    class_name: String,
    #[serde(default)]
    args: Vec<Vec<Value>>,
    #[serde(default)]
    config: LayerConfig,
    #[serde(flatten)]
    options: BatchOptions,
}

impl TryFrom<Map<String, Value>> for RepeatSpec {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        if let Some(key) = map.keys().find(|k| !REPEAT_KEYS.contains(&k.as_str())) {
            return Err(format!("unknown repeat option `{}`", key));
        }
        let fields: RepeatFields =
            serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())?;
        Ok(RepeatSpec {
            class_name: fields.class_name,
            args: fields.args,
            config: fields.config,
            options: fields.options,
        })
    }
}

/// An entry of a stack description.
///
/// An object with a `repeat` member is a [`RepeatSpec`], anything else is
/// read as a [`LayerSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "Map<String, Value>")]
pub enum LayerEntry {
    Repeat { repeat: RepeatSpec },
    Single(LayerSpec),
}

impl TryFrom<Map<String, Value>> for LayerEntry {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let Some(repeat) = map.remove("repeat") else {
            let spec = serde_json::from_value(Value::Object(map)).map_err(|e| e.to_string())?;
            return Ok(LayerEntry::Single(spec));
        };
        if let Some(key) = map.keys().next() {
            return Err(format!("unexpected key `{}` next to `repeat`", key));
        }
        let repeat = serde_json::from_value(repeat).map_err(|e| e.to_string())?;
        Ok(LayerEntry::Repeat { repeat })
    }
}

impl From<LayerSpec> for LayerEntry {
    fn from(spec: LayerSpec) -> Self {
        LayerEntry::Single(spec)
    }
}

impl From<RepeatSpec> for LayerEntry {
    fn from(repeat: RepeatSpec) -> Self {
        LayerEntry::Repeat { repeat }
    }
}

/// A whole stack: `{"name": "encoder", "layers": [...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StackSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub layers: Vec<LayerEntry>,
}

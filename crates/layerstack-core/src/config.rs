use crate::error::{LayerError, LayerResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration key holding a layer's name.
pub const NAME_KEY: &str = "name";

/// Configuration key holding the input shape of the first layer in a stack.
pub const INPUT_SHAPE_KEY: &str = "input_shape";

/// Keyword configuration handed to a layer constructor.
///
/// Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerConfig {
    entries: Map<String, Value>,
}

impl LayerConfig {
    pub fn new() -> Self {
        LayerConfig { entries: Map::new() }
    }

    /// Builder form of [`LayerConfig::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an option, returning the value it replaced.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// The `name` option, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.get_str(NAME_KEY)
    }

    /// The `input_shape` option as a list of dimensions.
    pub fn input_shape(&self) -> Option<Vec<usize>> {
        self.get_shape(INPUT_SHAPE_KEY)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(Value::as_u64).and_then(|n| usize::try_from(n).ok())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Read a shape stored either as an array of dimensions or a single integer.
    pub fn get_shape(&self, key: &str) -> Option<Vec<usize>> {
        match self.get(key)? {
            Value::Array(dims) => dims
                .iter()
                .map(|d| d.as_u64().and_then(|n| usize::try_from(n).ok()))
                .collect(),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(|n| vec![n]),
            _ => None,
        }
    }

    pub fn require_str(&self, key: &str) -> LayerResult<&str> {
        self.get_str(key).ok_or_else(|| missing(key, "a string"))
    }

    pub fn require_usize(&self, key: &str) -> LayerResult<usize> {
        self.get_usize(key)
            .ok_or_else(|| missing(key, "a non-negative integer"))
    }

    pub fn require_f64(&self, key: &str) -> LayerResult<f64> {
        self.get_f64(key).ok_or_else(|| missing(key, "a number"))
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

fn missing(key: &str, expected: &str) -> LayerError {
    LayerError::InvalidConfig(format!("option `{}` must be {}", key, expected))
}

impl From<Map<String, Value>> for LayerConfig {
    fn from(entries: Map<String, Value>) -> Self {
        LayerConfig { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for LayerConfig {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        LayerConfig {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut config = LayerConfig::new()
            .with("activation", "relu")
            .with("units", 32);
        assert_eq!(config.len(), 2);
        assert_eq!(config.get_str("activation"), Some("relu"));
        assert_eq!(config.get_usize("units"), Some(32));

        let old = config.set("units", 64);
        assert_eq!(old, Some(json!(32)));
        assert_eq!(config.get_usize("units"), Some(64));

        assert_eq!(config.remove("activation"), Some(json!("relu")));
        assert!(!config.contains_key("activation"));
    }

    #[test]
    fn test_shapes() {
        let config = LayerConfig::new()
            .with(INPUT_SHAPE_KEY, json!([3, 4]))
            .with("kernel_size", 5)
            .with("bad", json!(["a"]));
        assert_eq!(config.input_shape(), Some(vec![3, 4]));
        assert_eq!(config.get_shape("kernel_size"), Some(vec![5]));
        assert_eq!(config.get_shape("bad"), None);
        assert_eq!(config.get_shape("missing"), None);
    }

    #[test]
    fn test_integers_outside_usize_are_rejected() {
        let config = LayerConfig::new()
            .with("units", u64::MAX)
            .with("filters", -3)
            .with(INPUT_SHAPE_KEY, json!([2, u64::MAX]));

        // Only representable on targets where usize holds a u64.
        let big = usize::try_from(u64::MAX).ok();
        assert_eq!(config.get_usize("units"), big);
        assert_eq!(config.input_shape(), big.map(|b| vec![2, b]));

        assert_eq!(config.get_usize("filters"), None);
        assert!(config.require_usize("filters").is_err());
    }

    #[test]
    fn test_require_reports_key() {
        let config = LayerConfig::new().with("units", "many");
        let err = config.require_usize("units").unwrap_err();
        assert!(matches!(err, LayerError::InvalidConfig(ref msg) if msg.contains("units")));
        assert!(config.require_f64("rate").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let config: LayerConfig =
            serde_json::from_value(json!({"name": "dense", "units": 10})).unwrap();
        assert_eq!(config.name(), Some("dense"));
        assert_eq!(
            serde_json::to_value(&config).unwrap(),
            json!({"name": "dense", "units": 10})
        );
    }
}

use crate::config::INPUT_SHAPE_KEY;
use crate::error::{LayerError, LayerResult};
use serde::{Deserialize, Serialize};

/// Options controlling how a batch of layers is constructed.
///
/// Every field has a default, so a partial JSON object deserializes:
///
/// ```
/// use layerstack_core::BatchOptions;
///
/// let opts: BatchOptions = serde_json::from_str(r#"{"name": "rnn"}"#).unwrap();
/// assert_eq!(opts.name_for(1).unwrap().as_deref(), Some("rnn_2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Base name; layer `i` is named `{name}_{name_start_index + i}`.
    pub name: Option<String>,
    /// Suffix of the first named layer.
    pub name_start_index: usize,
    /// Option passed to the first layer only.
    pub initial_only_key: String,
    /// Reject argument lists longer than the first one instead of ignoring
    /// their trailing elements.
    pub strict_lengths: bool,
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn start_index(mut self, index: usize) -> Self {
        self.name_start_index = index;
        self
    }

    pub fn initial_only(mut self, key: impl Into<String>) -> Self {
        self.initial_only_key = key.into();
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_lengths = true;
        self
    }

    /// The base name, ignoring an empty string.
    pub fn base_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Name assigned to the `index`-th layer of the batch, if naming is on.
    ///
    /// Fails with [`LayerError::InvalidConfig`] when the suffix does not fit
    /// in a `usize`.
    pub fn name_for(&self, index: usize) -> LayerResult<Option<String>> {
        let Some(base) = self.base_name() else {
            return Ok(None);
        };
        let suffix = self.name_start_index.checked_add(index).ok_or_else(|| {
            LayerError::InvalidConfig(format!(
                "name suffix overflows: name_start_index {} + layer {}",
                self.name_start_index, index
            ))
        })?;
        Ok(Some(format!("{}_{}", base, suffix)))
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            name: None,
            name_start_index: 1,
            initial_only_key: INPUT_SHAPE_KEY.to_string(),
            strict_lengths: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = BatchOptions::default();
        assert_eq!(opts.name, None);
        assert_eq!(opts.name_start_index, 1);
        assert_eq!(opts.initial_only_key, "input_shape");
        assert!(!opts.strict_lengths);
        assert_eq!(opts.name_for(0), Ok(None));
    }

    #[test]
    fn test_name_for() {
        let opts = BatchOptions::new().named("h");
        let names: Vec<_> = (0..3).filter_map(|i| opts.name_for(i).unwrap()).collect();
        assert_eq!(names, vec!["h_1", "h_2", "h_3"]);

        let opts = BatchOptions::new().named("conv").start_index(0);
        assert_eq!(opts.name_for(2).unwrap().as_deref(), Some("conv_2"));
    }

    #[test]
    fn test_name_suffix_overflow() {
        let opts = BatchOptions::new().named("h").start_index(usize::MAX);
        assert_eq!(
            opts.name_for(0).unwrap().as_deref(),
            Some(format!("h_{}", usize::MAX).as_str())
        );
        let err = opts.name_for(1).unwrap_err();
        assert!(matches!(err, LayerError::InvalidConfig(ref msg) if msg.contains("overflows")));

        // Without a base name there is no suffix to compute.
        let unnamed = BatchOptions::new().start_index(usize::MAX);
        assert_eq!(unnamed.name_for(1), Ok(None));
    }

    #[test]
    fn test_empty_name_disables_naming() {
        let opts = BatchOptions::new().named("");
        assert_eq!(opts.base_name(), None);
        assert_eq!(opts.name_for(0), Ok(None));
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: BatchOptions =
            serde_json::from_str(r#"{"name_start_index": 5, "strict_lengths": true}"#).unwrap();
        assert_eq!(opts.name_start_index, 5);
        assert!(opts.strict_lengths);
        assert_eq!(opts.initial_only_key, INPUT_SHAPE_KEY);
    }
}

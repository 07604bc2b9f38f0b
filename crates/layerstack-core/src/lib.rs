pub mod config;
pub mod error;
pub mod options;

pub use config::{LayerConfig, INPUT_SHAPE_KEY, NAME_KEY};
pub use error::{LayerError, LayerResult};
pub use options::BatchOptions;
pub use serde_json::Value;

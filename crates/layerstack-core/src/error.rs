use thiserror::Error;

/// Error type shared by every layerstack crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayerError {
    #[error("Invalid input kind: expected an ordered sequence of layers or a value exposing `layers`, got {found}")]
    InvalidInputKind { found: String },

    #[error("Index out of range: index {index} for argument list {list} with length {len}")]
    IndexOutOfRange {
        list: usize,
        index: usize,
        len: usize,
    },

    #[error("Argument list length mismatch: list {list} has {found} elements, expected {expected}")]
    LengthMismatch {
        list: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown layer class: {0}")]
    UnknownLayer(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("I/O error: {0}")]
    Io(String),
}

pub type LayerResult<T> = Result<T, LayerError>;

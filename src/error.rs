// WandWatch — Library error types

use thiserror::Error;

/// Errors reported by [`crate::sample_window::SampleWindow`].
///
/// All of them are local to the call that produced them; the buffer is left
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleWindowError {
    #[error("invalid sample: {0}")]
    InvalidInput(String),

    #[error("not enough history for a window yet")]
    NotReady,

    #[error("window of {requested} tuples exceeds capacity of {capacity}")]
    InvalidLength { requested: usize, capacity: usize },

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Errors reported by the inference facade in [`crate::model`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("model `{model}` tensor holds {expected} values, got {actual}")]
    Shape {
        model: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("model `{model}` invoke failed with status {code}")]
    Invoke { model: &'static str, code: i32 },
}

pub type Result<T, E = SampleWindowError> = std::result::Result<T, E>;

use accum_core::AccumulateError;

use crate::retry::RetryExhausted;

/// Errors raised while reading, regrouping or storing items.
#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The grouping engine failed (malformed row, ungrouped input, ...).
    #[error(transparent)]
    Accumulate(AccumulateError),

    #[error("invalid layout: {0}")]
    Layout(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<ItemError>,
    },
}

impl From<AccumulateError> for ItemError {
    /// Emission failures raised by an item consumer are surfaced unchanged
    /// rather than wrapped in the engine's error.
    fn from(error: AccumulateError) -> Self {
        match error {
            AccumulateError::Emit(source) => match source.downcast::<ItemError>() {
                Ok(inner) => *inner,
                Err(source) => Self::Accumulate(AccumulateError::Emit(source)),
            },
            other => Self::Accumulate(other),
        }
    }
}

impl From<RetryExhausted<ItemError>> for ItemError {
    fn from(error: RetryExhausted<ItemError>) -> Self {
        Self::Exhausted {
            attempts: error.attempts,
            source: Box::new(error.source),
        }
    }
}

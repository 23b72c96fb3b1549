// File: crates/adtui-model/src/error.rs
// Summary: Error type for the validating entry points (sample ordering, timer and animation options).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// A sample was appended with an x below the last stored x.
    #[error("sample at x={x} precedes the last stored sample at x={last}")]
    OutOfOrder { x: i64, last: i64 },

    #[error("frame rate must be positive, got {0} fps")]
    InvalidFrameRate(u32),

    #[error("interpolation fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;

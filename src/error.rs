//! Error types shared by the design, modelling and export layers

use thiserror::Error;

/// Errors surfaced to the caller of the design core
///
/// `InvalidSpec` and `InvalidModel` abort a computation. Undefined metrics
/// are not errors; see [`crate::metrics::ResponseMetrics`].
#[derive(Error, Debug)]
pub enum Error {
    /// Design specification or physical parameters are out of range,
    /// or the damping-ratio solve did not converge
    #[error("invalid design specification: {0}")]
    InvalidSpec(String),

    /// Degenerate transfer function encountered while composing the loop
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn spec(msg: impl Into<String>) -> Self {
        Error::InvalidSpec(msg.into())
    }

    pub(crate) fn model(msg: impl Into<String>) -> Self {
        Error::InvalidModel(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

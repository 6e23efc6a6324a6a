//! Error types for the comparison engine.
//!
//! The engine itself never surfaces these to a live-typing caller: public
//! entry points fall back to conservative defaults. They exist for the
//! internal fallible steps and for configuration loading.

use thiserror::Error;

/// Result type alias using the engine's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Normalization did not reach a fixpoint after {0} passes")]
    NormalizationDiverged(usize),

    #[error("Character alignment failed: {0}")]
    Alignment(String),
}

#![forbid(unsafe_code)]

//! Construction-time errors.
//!
//! The controller has no runtime failure modes: once a [`Typer`] exists,
//! every timer firing is a valid step. Everything that can go wrong is
//! caught here, before any run state is built.
//!
//! [`Typer`]: crate::Typer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("spool has no non-empty strings")]
    EmptySpool,

    #[error(
        "unbounded repeats with zero pre-type and pre-erase delays would cycle without time passing"
    )]
    ZeroLengthCycle,

    #[error("unknown {kind} token: {token:?}")]
    UnknownToken { kind: &'static str, token: String },

    #[cfg(feature = "config-file")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigurationError {
    #[must_use]
    pub fn unknown_token(kind: &'static str, token: impl Into<String>) -> Self {
        Self::UnknownToken {
            kind,
            token: token.into(),
        }
    }
}

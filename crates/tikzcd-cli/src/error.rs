//! Error type for the CLI.

use std::io;

use thiserror::Error;

use tikzcd::{TikzcdError, codec::CodecError};

use crate::config::ConfigError;

/// Everything that can stop a conversion run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tikzcd(#[from] TikzcdError),
}

impl From<CodecError> for CliError {
    fn from(err: CodecError) -> Self {
        Self::Tikzcd(TikzcdError::from(err))
    }
}

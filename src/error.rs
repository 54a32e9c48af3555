// ABOUTME: Application-wide error types for armtest.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::config::ConfigError;
use crate::deploy::DeployError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

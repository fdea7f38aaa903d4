use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Top-level error for the terminal host.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read chain config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid chain config: {0}")]
    Parse(String),
}

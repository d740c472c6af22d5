use thiserror::Error;

#[derive(Debug, Error)]
pub enum EthashError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dump size mismatch: expected {expected} bytes, found {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("dump has an invalid magic header")]
    BadMagic,

    #[error("config error: {0}")]
    Config(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordchainError {
    #[error("invalid peer address: {0}")]
    InvalidAddress(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

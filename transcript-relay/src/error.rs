use common::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Transport unavailable: {0}")]
    Unavailable(String),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Request(e) => AppError::Reqwest(e),
            TransportError::Unavailable(msg) => AppError::InternalError(msg),
        }
    }
}

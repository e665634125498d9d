use common::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read Word document: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Failed to read Word document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Failed to read Word document: missing part {0}")]
    MissingPart(String),
    #[error("Failed to read Word document: {0} is not valid UTF-8")]
    Encoding(String),
    #[error("No tables found in Word document")]
    NoTables,
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Io(e) => AppError::Io(e),
            other => AppError::Document(other.to_string()),
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid skill catalog: {0}")]
    InvalidCatalog(String),
    #[error("Parse error: {0}")]
    DocumentParse(String),
}

impl CoreError {
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CoreError::UnsupportedFormat(_) | CoreError::InvalidInput(_)
        )
    }
}

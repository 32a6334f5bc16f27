use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("contact name is required")]
    EmptyName,
    #[error("user name is required")]
    EmptyUserName,
    #[error("owner id is required")]
    EmptyOwnerId,
    #[error("invalid max upload size: {0} bytes")]
    InvalidMaxUploadBytes(u64),
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),
}

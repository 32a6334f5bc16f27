use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("unsupported file type: {name}; use CSV (.csv) or vCard (.vcf, .vcard) files")]
    UnsupportedFileType { name: String },
    #[error("file too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },
    #[error("contact picker is not supported on this device")]
    CapabilityUnavailable,
    #[error("no contact properties are accessible")]
    NoAccessibleFields,
    #[error("permission denied; allow access to contacts")]
    PermissionDenied,
    #[error("another contact picker is already open")]
    ConcurrentPicker,
    #[error("contact picker failed: {0}")]
    Picker(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;

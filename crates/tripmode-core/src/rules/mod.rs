pub mod upload;
pub mod validation;

pub use upload::{
    file_extension, normalize_extension, validate_max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES,
    MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS,
};
pub use validation::{validate_contacts, ContactValidation, InvalidContact, InvalidReason};

use crate::error::CoreError;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".csv", ".vcf", ".vcard"];

pub fn validate_max_upload_bytes(value: u64) -> Result<u64, CoreError> {
    if value == 0 || value > MAX_UPLOAD_BYTES {
        return Err(CoreError::InvalidMaxUploadBytes(value));
    }
    Ok(value)
}

/// Lowercases an extension, adds the leading dot, and checks it is importable.
pub fn normalize_extension(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::UnsupportedExtension(raw.to_string()));
    }
    let lower = trimmed.to_ascii_lowercase();
    let ext = if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    };
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::UnsupportedExtension(raw.to_string()));
    }
    Ok(ext)
}

/// Returns the lowercased `.ext` suffix of a file name, if it has one.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_max_upload_bytes_bounds() {
        assert!(validate_max_upload_bytes(0).is_err());
        assert!(validate_max_upload_bytes(MAX_UPLOAD_BYTES + 1).is_err());
        assert_eq!(
            validate_max_upload_bytes(DEFAULT_MAX_UPLOAD_BYTES),
            Ok(DEFAULT_MAX_UPLOAD_BYTES)
        );
    }

    #[test]
    fn normalize_extension_adds_dot_and_lowercases() {
        assert_eq!(normalize_extension("VCF").as_deref(), Ok(".vcf"));
        assert_eq!(normalize_extension(".Csv").as_deref(), Ok(".csv"));
    }

    #[test]
    fn normalize_extension_rejects_unknown() {
        assert_eq!(
            normalize_extension("txt"),
            Err(CoreError::UnsupportedExtension("txt".to_string()))
        );
        assert!(normalize_extension("  ").is_err());
    }

    #[test]
    fn file_extension_uses_last_segment() {
        assert_eq!(file_extension("Contacts.Backup.VCF").as_deref(), Some(".vcf"));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension("trailing."), None);
    }
}

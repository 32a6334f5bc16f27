use crate::batch::ParsedContacts;
use crate::csv_file::{self, CsvColumnMapping};
use crate::error::{ImportError, Result};
use crate::file::ContactFile;
use crate::vcf;
use serde::Serialize;
use tracing::debug;
use tripmode_core::rules::{file_extension, DEFAULT_MAX_UPLOAD_BYTES, SUPPORTED_EXTENSIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFileKind {
    Csv,
    VCard,
}

impl ContactFileKind {
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".csv") {
            Some(ContactFileKind::Csv)
        } else if lower.ends_with(".vcf") || lower.ends_with(".vcard") {
            Some(ContactFileKind::VCard)
        } else {
            None
        }
    }
}

/// Routes a file to the matching extractor by its extension.
///
/// Unknown extensions fail before the file content is touched.
pub fn parse_contact_file(
    file: &dyn ContactFile,
    mapping: &CsvColumnMapping,
) -> Result<ParsedContacts> {
    let kind = ContactFileKind::from_file_name(file.name()).ok_or_else(|| {
        ImportError::UnsupportedFileType {
            name: file.name().to_string(),
        }
    })?;
    debug!(file = file.name(), kind = ?kind, "parsing contact file");

    match kind {
        ContactFileKind::Csv => csv_file::parse_csv_file(file, mapping),
        ContactFileKind::VCard => vcf::parse_vcard_file(file),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
    pub accepted_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            accepted_extensions: SUPPORTED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

/// Checks type and size of an upload before it is handed to the parsers.
pub fn validate_upload(file: &dyn ContactFile, policy: &UploadPolicy) -> Result<()> {
    let accepted = file_extension(file.name())
        .map(|ext| policy.accepted_extensions.contains(&ext))
        .unwrap_or(false);
    if !accepted {
        return Err(ImportError::UnsupportedFileType {
            name: file.name().to_string(),
        });
    }

    let size = file.size()?;
    if size > policy.max_size_bytes {
        return Err(ImportError::FileTooLarge {
            size,
            max: policy.max_size_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::MemoryFile;
    use std::cell::Cell;
    use std::io;

    struct SpyFile {
        name: &'static str,
        reads: Cell<usize>,
    }

    impl SpyFile {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                reads: Cell::new(0),
            }
        }
    }

    impl ContactFile for SpyFile {
        fn name(&self) -> &str {
            self.name
        }

        fn size(&self) -> io::Result<u64> {
            Ok(10)
        }

        fn read_text(&self) -> io::Result<String> {
            self.reads.set(self.reads.get() + 1);
            Ok(String::new())
        }
    }

    #[test]
    fn unsupported_extension_fails_without_reading() {
        let file = SpyFile::new("contacts.txt");
        let err = parse_contact_file(&file, &CsvColumnMapping::default()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileType { .. }));
        assert!(err.to_string().contains(".vcf"));
        assert_eq!(file.reads.get(), 0);
    }

    #[test]
    fn dispatches_by_lowercased_extension() {
        assert_eq!(
            ContactFileKind::from_file_name("People.CSV"),
            Some(ContactFileKind::Csv)
        );
        assert_eq!(
            ContactFileKind::from_file_name("phone.VCard"),
            Some(ContactFileKind::VCard)
        );
        assert_eq!(
            ContactFileKind::from_file_name("export.vcf"),
            Some(ContactFileKind::VCard)
        );
        assert_eq!(ContactFileKind::from_file_name("notes.vcf.txt"), None);
    }

    #[test]
    fn parse_contact_file_routes_to_extractors() {
        let csv = MemoryFile::new("people.csv", "Name,Email\nAda,ada@x.com\n");
        let parsed = parse_contact_file(&csv, &CsvColumnMapping::default()).expect("csv");
        assert_eq!(parsed.contacts[0].name, "Ada");

        let vcard = MemoryFile::new(
            "people.vcf",
            "BEGIN:VCARD\nFN:Grace\nTEL:555 0102\nEND:VCARD\n",
        );
        let parsed = parse_contact_file(&vcard, &CsvColumnMapping::default()).expect("vcf");
        assert_eq!(parsed.contacts[0].phone.as_deref(), Some("5550102"));
    }

    #[test]
    fn parse_contact_file_reads_once() {
        let file = SpyFile::new("empty.vcard");
        let parsed = parse_contact_file(&file, &CsvColumnMapping::default()).expect("parse");
        assert!(parsed.is_empty());
        assert_eq!(file.reads.get(), 1);
    }

    #[test]
    fn validate_upload_checks_extension_and_size() {
        let policy = UploadPolicy {
            max_size_bytes: 8,
            ..UploadPolicy::default()
        };

        let small = MemoryFile::new("a.csv", "Name\n");
        assert!(validate_upload(&small, &policy).is_ok());

        let large = MemoryFile::new("a.vcf", "BEGIN:VCARD\n");
        let err = validate_upload(&large, &policy).unwrap_err();
        assert!(matches!(err, ImportError::FileTooLarge { size: 12, max: 8 }));

        let wrong = MemoryFile::new("a.xlsx", "");
        let err = validate_upload(&wrong, &policy).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFileType { .. }));
    }

    #[test]
    fn validate_upload_respects_narrowed_extensions() {
        let policy = UploadPolicy {
            accepted_extensions: vec![".vcf".to_string()],
            ..UploadPolicy::default()
        };
        let csv = MemoryFile::new("a.csv", "Name\n");
        assert!(validate_upload(&csv, &policy).is_err());
    }
}

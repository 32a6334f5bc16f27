use std::fs;
use std::io;
use std::path::PathBuf;

/// A named blob of contact data handed over by the caller.
pub trait ContactFile {
    fn name(&self) -> &str;
    fn size(&self) -> io::Result<u64>;
    fn read_text(&self) -> io::Result<String>;
}

#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

impl ContactFile for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> io::Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Invalid UTF-8 is replaced, not rejected; only I/O failures are errors.
    fn read_text(&self) -> io::Result<String> {
        let bytes = fs::read(&self.path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    content: String,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl ContactFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.content.len() as u64)
    }

    fn read_text(&self) -> io::Result<String> {
        Ok(self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_file::CsvColumnMapping;
    use crate::dispatch::parse_contact_file;
    use tempfile::TempDir;

    #[test]
    fn local_file_reports_name_size_and_text() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("people.csv");
        fs::write(&path, "Name,Email\n").expect("write");

        let file = LocalFile::new(&path);
        assert_eq!(file.name(), "people.csv");
        assert_eq!(file.size().expect("size"), 11);
        assert_eq!(file.read_text().expect("read"), "Name,Email\n");
    }

    #[test]
    fn local_file_read_fails_for_missing_path() {
        let temp = TempDir::new().expect("tempdir");
        let file = LocalFile::new(temp.path().join("missing.vcf"));
        assert!(file.read_text().is_err());
    }

    #[test]
    fn local_file_decodes_invalid_utf8_lossily() {
        let temp = TempDir::new().expect("tempdir");

        let csv_path = temp.path().join("people.csv");
        fs::write(&csv_path, b"Name,Email\nJos\xe9,jose@x.com\nAda,ada@x.com\n").expect("write");
        let parsed = parse_contact_file(&LocalFile::new(&csv_path), &CsvColumnMapping::default())
            .expect("parse csv");
        assert_eq!(parsed.contacts.len(), 2);
        assert_eq!(parsed.contacts[0].name, "Jos\u{fffd}");
        assert_eq!(parsed.contacts[1].name, "Ada");

        let vcf_path = temp.path().join("people.vcf");
        fs::write(
            &vcf_path,
            b"BEGIN:VCARD\nFN:Jos\xe9\nEMAIL:jose@x.com\nEND:VCARD\nBEGIN:VCARD\nFN:Ada\nTEL:555 0101\nEND:VCARD\n",
        )
        .expect("write");
        let parsed = parse_contact_file(&LocalFile::new(&vcf_path), &CsvColumnMapping::default())
            .expect("parse vcf");
        assert_eq!(parsed.contacts.len(), 2);
        assert_eq!(parsed.skipped, 0);
    }
}

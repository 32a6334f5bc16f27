pub mod batch;
pub mod csv_file;
pub mod dispatch;
pub mod error;
pub mod file;
pub mod macos;
pub mod picker;
pub mod vcf;

pub use batch::ParsedContacts;
pub use csv_file::CsvColumnMapping;
pub use dispatch::{parse_contact_file, validate_upload, ContactFileKind, UploadPolicy};
pub use error::{ImportError, Result};
pub use file::{ContactFile, LocalFile, MemoryFile};
pub use picker::{pick_contacts, ContactProperty, ContactsManager, PickedContact, PlatformError};

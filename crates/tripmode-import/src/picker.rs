use crate::error::{ImportError, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tripmode_core::domain::{normalize_email, normalize_phone, ParsedContact};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactProperty {
    Name,
    Email,
    Tel,
    Address,
    Icon,
}

impl ContactProperty {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactProperty::Name => "name",
            ContactProperty::Email => "email",
            ContactProperty::Tel => "tel",
            ContactProperty::Address => "address",
            ContactProperty::Icon => "icon",
        }
    }
}

/// Fields requested from the platform, in this order, when available.
pub const REQUESTED_PROPERTIES: [ContactProperty; 3] = [
    ContactProperty::Name,
    ContactProperty::Email,
    ContactProperty::Tel,
];

/// A contact as returned by the platform: every field may carry several values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickedContact {
    pub name: Vec<String>,
    pub email: Vec<String>,
    pub tel: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    pub multiple: bool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("security error: {0}")]
    Security(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("{0}")]
    Other(String),
}

impl From<PlatformError> for ImportError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Security(_) => ImportError::PermissionDenied,
            PlatformError::InvalidState(_) => ImportError::ConcurrentPicker,
            PlatformError::Other(message) => ImportError::Picker(message),
        }
    }
}

/// The platform's contact selection capability.
///
/// Callers hold an `Option` of this: `None` means the runtime has no picker
/// at all and contacts must come from a file instead.
pub trait ContactsManager {
    fn properties(&self) -> std::result::Result<Vec<ContactProperty>, PlatformError>;
    fn select(
        &self,
        properties: &[ContactProperty],
        options: SelectOptions,
    ) -> std::result::Result<Vec<PickedContact>, PlatformError>;
}

pub fn is_picker_supported(manager: Option<&dyn ContactsManager>) -> bool {
    manager.is_some()
}

/// Properties the platform exposes; failures are treated as "none".
pub fn supported_properties(manager: Option<&dyn ContactsManager>) -> Vec<ContactProperty> {
    let Some(manager) = manager else {
        return Vec::new();
    };
    match manager.properties() {
        Ok(properties) => properties,
        Err(err) => {
            debug!(error = %err, "contact properties unavailable");
            Vec::new()
        }
    }
}

pub fn pick_contacts(manager: Option<&dyn ContactsManager>) -> Result<Vec<ParsedContact>> {
    let manager = manager.ok_or(ImportError::CapabilityUnavailable)?;

    let available = manager.properties()?;
    let requested: Vec<ContactProperty> = REQUESTED_PROPERTIES
        .into_iter()
        .filter(|property| available.contains(property))
        .collect();
    if requested.is_empty() {
        return Err(ImportError::NoAccessibleFields);
    }
    debug!(
        properties = ?requested.iter().map(ContactProperty::as_str).collect::<Vec<_>>(),
        "opening contact picker"
    );

    let selected = manager.select(&requested, SelectOptions { multiple: true })?;
    let total = selected.len();
    let contacts: Vec<ParsedContact> = selected.iter().filter_map(to_parsed_contact).collect();
    debug!(selected = total, kept = contacts.len(), "contact picker returned");
    Ok(contacts)
}

fn to_parsed_contact(picked: &PickedContact) -> Option<ParsedContact> {
    let name = picked.name.first().cloned().unwrap_or_default();
    let email = picked.email.first().and_then(|email| normalize_email(email));
    let phone = picked.tel.first().and_then(|tel| normalize_phone(tel));
    let contact = ParsedContact::new(name, email, phone);
    contact.is_complete().then_some(contact)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMethod {
    Picker,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportMethodDescription {
    pub method: ImportMethod,
    pub title: &'static str,
    pub description: &'static str,
}

pub fn best_import_method(manager: Option<&dyn ContactsManager>) -> ImportMethod {
    if is_picker_supported(manager) {
        ImportMethod::Picker
    } else {
        ImportMethod::File
    }
}

pub fn import_method_description(manager: Option<&dyn ContactsManager>) -> ImportMethodDescription {
    match best_import_method(manager) {
        ImportMethod::Picker => ImportMethodDescription {
            method: ImportMethod::Picker,
            title: "Sync from Phone",
            description: "Select contacts directly from your phone",
        },
        ImportMethod::File => ImportMethodDescription {
            method: ImportMethod::File,
            title: "Import from File",
            description: "Upload a CSV or vCard file exported from your contacts app",
        },
    }
}

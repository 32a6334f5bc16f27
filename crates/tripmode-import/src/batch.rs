use serde::Serialize;
use tripmode_core::domain::ParsedContact;

/// Output of a file import: the usable contacts plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedContacts {
    pub contacts: Vec<ParsedContact>,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl ParsedContacts {
    pub(crate) fn push(&mut self, contact: ParsedContact) {
        self.contacts.push(contact);
    }

    pub(crate) fn skip(&mut self, warning: String) {
        self.skipped += 1;
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}

use crate::domain::ids::{ContactId, UserId};
use crate::domain::owner::OwnerId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A contact produced by an importer, before it has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedContact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ParsedContact {
    pub fn new(name: impl Into<String>, email: Option<String>, phone: Option<String>) -> Self {
        Self {
            name: name.into(),
            email,
            phone,
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn has_contact_info(&self) -> bool {
        self.email.is_some() || self.phone.is_some()
    }

    /// Importers only emit contacts that pass this check.
    pub fn is_complete(&self) -> bool {
        self.has_name() && self.has_contact_info()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewContact {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredContact {
    pub id: ContactId,
    pub owner_id: OwnerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub matched_user_id: Option<UserId>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub fn prepare_contacts_for_save(contacts: &[ParsedContact]) -> Vec<NewContact> {
    contacts
        .iter()
        .map(|contact| NewContact {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_contact_completeness() {
        let full = ParsedContact::new("Ada", Some("ada@example.com".to_string()), None);
        assert!(full.is_complete());

        let no_info = ParsedContact::new("Ada", None, None);
        assert!(!no_info.is_complete());

        let blank_name = ParsedContact::new("  ", None, Some("555".to_string()));
        assert!(!blank_name.is_complete());
    }

    #[test]
    fn prepare_contacts_for_save_copies_fields_in_order() {
        let parsed = vec![
            ParsedContact::new("Ada", Some("ada@example.com".to_string()), None),
            ParsedContact::new("Grace", None, Some("+15550001111".to_string())),
        ];
        let prepared = prepare_contacts_for_save(&parsed);
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].name, "Ada");
        assert_eq!(prepared[0].email.as_deref(), Some("ada@example.com"));
        assert_eq!(prepared[1].phone.as_deref(), Some("+15550001111"));
    }

    #[test]
    fn new_contact_requires_name() {
        let contact = NewContact {
            name: " ".to_string(),
            email: None,
            phone: None,
        };
        assert_eq!(contact.validate(), Err(CoreError::EmptyName));
    }
}

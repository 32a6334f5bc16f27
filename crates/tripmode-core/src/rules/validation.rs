use crate::domain::ParsedContact;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    MissingName,
    NoContactInfo,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::MissingName => "Missing name",
            InvalidReason::NoContactInfo => "No email or phone",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InvalidReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidContact {
    pub contact: ParsedContact,
    pub reason: InvalidReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactValidation {
    pub valid: Vec<ParsedContact>,
    pub invalid: Vec<InvalidContact>,
}

/// Splits contacts into those ready to save and those that are not.
///
/// A missing name is reported before missing contact details. Both buckets
/// keep the input order.
pub fn validate_contacts(contacts: Vec<ParsedContact>) -> ContactValidation {
    let mut result = ContactValidation::default();

    for contact in contacts {
        let reason = if !contact.has_name() {
            Some(InvalidReason::MissingName)
        } else if !contact.has_contact_info() {
            Some(InvalidReason::NoContactInfo)
        } else {
            None
        };

        match reason {
            Some(reason) => result.invalid.push(InvalidContact { contact, reason }),
            None => result.valid.push(contact),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: Option<&str>, phone: Option<&str>) -> ParsedContact {
        ParsedContact::new(name, email.map(str::to_string), phone.map(str::to_string))
    }

    #[test]
    fn validate_contacts_partitions_in_order() {
        let first = contact("", Some("x@y.com"), None);
        let second = contact("A", Some("a@b.com"), None);
        let third = contact("B", None, None);

        let result = validate_contacts(vec![first.clone(), second.clone(), third.clone()]);

        assert_eq!(result.valid, vec![second]);
        assert_eq!(
            result.invalid,
            vec![
                InvalidContact {
                    contact: first,
                    reason: InvalidReason::MissingName,
                },
                InvalidContact {
                    contact: third,
                    reason: InvalidReason::NoContactInfo,
                },
            ]
        );
    }

    #[test]
    fn missing_name_wins_over_missing_contact_info() {
        let result = validate_contacts(vec![contact("", None, None)]);
        assert_eq!(result.invalid[0].reason, InvalidReason::MissingName);
        assert_eq!(result.invalid[0].reason.to_string(), "Missing name");
    }

    #[test]
    fn phone_alone_is_enough() {
        let result = validate_contacts(vec![contact("Ada", None, Some("5550101"))]);
        assert_eq!(result.valid.len(), 1);
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_partition() {
        let result = validate_contacts(Vec::new());
        assert!(result.valid.is_empty());
        assert!(result.invalid.is_empty());
    }
}

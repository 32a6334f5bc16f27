use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the account that owns an imported contact list.
///
/// Owners come from the authentication layer, so the value is opaque here;
/// only surrounding whitespace is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyOwnerId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::OwnerId;
    use crate::error::CoreError;

    #[test]
    fn owner_id_trims_input() {
        let owner = OwnerId::new("  uid-42 ").unwrap();
        assert_eq!(owner.as_str(), "uid-42");
    }

    #[test]
    fn owner_id_rejects_blank() {
        assert_eq!(OwnerId::new("   "), Err(CoreError::EmptyOwnerId));
    }
}

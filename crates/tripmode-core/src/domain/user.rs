use crate::domain::ids::UserId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// A registered Trip Mode user, as seen by contact matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: i64,
}

impl UserProfile {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyUserName);
        }
        Ok(())
    }
}

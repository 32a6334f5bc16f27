pub mod contact;
pub mod email;
pub mod ids;
pub mod owner;
pub mod phone;
pub mod user;

pub use contact::{prepare_contacts_for_save, NewContact, ParsedContact, StoredContact};
pub use email::normalize_email;
pub use ids::{ContactId, UserId};
pub use owner::OwnerId;
pub use phone::normalize_phone;
pub use user::UserProfile;

pub mod contacts;
pub mod users;

pub use contacts::{ContactUpdate, ContactsRepo};
pub use users::{UserNew, UsersRepo};

use crate::error::Result;
use crate::Store;
use tripmode_core::domain::{OwnerId, StoredContact, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub checked: usize,
    pub matched: usize,
}

/// Looks up the registered user behind a contact: email first, then phone.
pub fn find_matching_user(store: &Store, contact: &StoredContact) -> Result<Option<UserId>> {
    let users = store.users();
    if let Some(email) = contact.email.as_deref() {
        if let Some(id) = users.find_by_email(email)? {
            return Ok(Some(id));
        }
    }
    match contact.phone.as_deref() {
        Some(phone) => users.find_by_phone(phone),
        None => Ok(None),
    }
}

/// Annotates each contact with its matched user, leaving unmatched ones empty.
pub fn match_contacts_with_users(
    store: &Store,
    contacts: &[StoredContact],
) -> Result<Vec<StoredContact>> {
    contacts
        .iter()
        .map(|contact| {
            let matched_user_id = find_matching_user(store, contact)?;
            Ok(StoredContact {
                matched_user_id,
                ..contact.clone()
            })
        })
        .collect()
}

/// Re-matches an owner's stored contacts and persists the result.
pub fn match_owner_contacts(store: &Store, owner: &OwnerId) -> Result<MatchReport> {
    let contacts = store.contacts().list_for_owner(owner)?;
    let matched = match_contacts_with_users(store, &contacts)?;

    let tx = store.connection().unchecked_transaction()?;
    let repo = crate::repo::ContactsRepo::new(&tx);
    let mut report = MatchReport {
        checked: matched.len(),
        matched: 0,
    };
    for (before, after) in contacts.iter().zip(&matched) {
        if after.matched_user_id.is_some() {
            report.matched += 1;
        }
        if before.matched_user_id != after.matched_user_id {
            repo.set_matched_user(after.id, after.matched_user_id)?;
        }
    }
    tx.commit()?;
    Ok(report)
}

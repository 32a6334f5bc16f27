use crate::error::{Result, StoreError};
use rusqlite::{params, Connection};
use std::str::FromStr;
use tripmode_core::CoreError;
use tripmode_core::domain::{
    normalize_email, normalize_phone, ContactId, NewContact, OwnerId, StoredContact, UserId,
};

const CONTACT_COLUMNS: &str =
    "id, owner_id, name, email, phone, matched_user_id, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
}

pub struct ContactsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ContactsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn add(&self, now_utc: i64, owner: &OwnerId, input: NewContact) -> Result<StoredContact> {
        insert_contact(self.conn, now_utc, owner, input)
    }

    /// Stores a batch of imported contacts atomically, returning their new ids in input order.
    pub fn add_many(
        &self,
        now_utc: i64,
        owner: &OwnerId,
        contacts: &[NewContact],
    ) -> Result<Vec<ContactId>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let stored = insert_contact(&tx, now_utc, owner, contact.clone())?;
            ids.push(stored.id);
        }
        tx.commit()?;
        Ok(ids)
    }

    pub fn get(&self, id: ContactId) -> Result<Option<StoredContact>> {
        get_inner(self.conn, id)
    }

    pub fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<StoredContact>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS}
             FROM contacts
             WHERE owner_id = ?1
             ORDER BY name COLLATE NOCASE ASC, created_at ASC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(contact_from_row(row)?);
        }
        Ok(contacts)
    }

    pub fn update(
        &self,
        now_utc: i64,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<StoredContact> {
        let mut contact =
            get_inner(self.conn, id)?.ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(name) = update.name {
            contact.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            contact.email = email.as_deref().and_then(normalize_email);
        }
        if let Some(phone) = update.phone {
            contact.phone = phone.as_deref().and_then(normalize_phone);
        }
        if contact.name.is_empty() {
            return Err(CoreError::EmptyName.into());
        }
        contact.updated_at = now_utc;

        self.conn.execute(
            "UPDATE contacts
             SET name = ?1, email = ?2, phone = ?3, updated_at = ?4
             WHERE id = ?5;",
            params![
                contact.name,
                contact.email,
                contact.phone,
                contact.updated_at,
                contact.id.to_string()
            ],
        )?;
        Ok(contact)
    }

    pub fn set_matched_user(&self, id: ContactId, user_id: Option<UserId>) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE contacts SET matched_user_id = ?1 WHERE id = ?2;",
            params![user_id.map(|id| id.to_string()), id.to_string()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn delete(&self, id: ContactId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn insert_contact(
    conn: &Connection,
    now_utc: i64,
    owner: &OwnerId,
    input: NewContact,
) -> Result<StoredContact> {
    input.validate()?;
    let contact = StoredContact {
        id: ContactId::new(),
        owner_id: owner.clone(),
        name: input.name.trim().to_string(),
        email: input.email.as_deref().and_then(normalize_email),
        phone: input.phone.as_deref().and_then(normalize_phone),
        matched_user_id: None,
        created_at: now_utc,
        updated_at: now_utc,
    };

    conn.execute(
        "INSERT INTO contacts (id, owner_id, name, email, phone, matched_user_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7);",
        params![
            contact.id.to_string(),
            contact.owner_id.as_str(),
            contact.name,
            contact.email,
            contact.phone,
            contact.created_at,
            contact.updated_at,
        ],
    )?;

    Ok(contact)
}

fn get_inner(conn: &Connection, id: ContactId) -> Result<Option<StoredContact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1;"
    ))?;
    let mut rows = stmt.query([id.to_string()])?;
    match rows.next()? {
        Some(row) => Ok(Some(contact_from_row(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn contact_from_row(row: &rusqlite::Row<'_>) -> Result<StoredContact> {
    let id_str: String = row.get(0)?;
    let id = ContactId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let owner: String = row.get(1)?;
    let owner_id = OwnerId::new(&owner)?;
    let matched: Option<String> = row.get(5)?;
    let matched_user_id = matched
        .map(|raw| UserId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw.clone())))
        .transpose()?;
    Ok(StoredContact {
        id,
        owner_id,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        matched_user_id,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

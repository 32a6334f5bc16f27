use crate::error::{Result, StoreError};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use tripmode_core::domain::{normalize_email, normalize_phone, UserId, UserProfile};

#[derive(Debug, Clone)]
pub struct UserNew {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub struct UsersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> UsersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: UserNew) -> Result<UserProfile> {
        let user = UserProfile {
            id: UserId::new(),
            name: input.name.trim().to_string(),
            email: input.email.as_deref().and_then(normalize_email),
            phone: input.phone.as_deref().and_then(normalize_phone),
            created_at: now_utc,
        };
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (id, name, email, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.phone,
                user.created_at
            ],
        )?;
        Ok(user)
    }

    pub fn get(&self, id: UserId) -> Result<Option<UserProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, created_at FROM users WHERE id = ?1;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub fn list(&self) -> Result<Vec<UserProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, created_at
             FROM users
             ORDER BY name COLLATE NOCASE ASC, created_at ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(user_from_row(row)?);
        }
        Ok(users)
    }

    /// Exact match on the stored email; the oldest registration wins.
    pub fn find_by_email(&self, email: &str) -> Result<Option<UserId>> {
        self.find_by_column("email", email)
    }

    /// Exact match on the stored, normalized phone; the oldest registration wins.
    pub fn find_by_phone(&self, phone: &str) -> Result<Option<UserId>> {
        self.find_by_column("phone", phone)
    }

    fn find_by_column(&self, column: &'static str, value: &str) -> Result<Option<UserId>> {
        let id_str: Option<String> = self
            .conn
            .query_row(
                &format!(
                    "SELECT id FROM users WHERE {column} = ?1 ORDER BY created_at ASC LIMIT 1;"
                ),
                [value],
                |row| row.get(0),
            )
            .optional()?;
        id_str
            .map(|raw| UserId::from_str(&raw).map_err(|_| StoreError::InvalidId(raw.clone())))
            .transpose()
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<UserProfile> {
    let id_str: String = row.get(0)?;
    let id = UserId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    Ok(UserProfile {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        created_at: row.get(4)?,
    })
}

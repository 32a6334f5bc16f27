use crate::error::invalid_input;
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::str::FromStr;
use tripmode_config::AppConfig;
use tripmode_core::domain::{ContactId, OwnerId};

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => ts.to_string(),
    }
}

/// `--owner` wins over the configured `default_owner`.
pub fn resolve_owner(arg: Option<&str>, config: &AppConfig) -> Result<OwnerId> {
    let raw = arg
        .or(config.default_owner.as_deref())
        .ok_or_else(|| invalid_input("--owner is required (or set default_owner in config)"))?;
    Ok(OwnerId::new(raw)?)
}

pub fn parse_contact_id(raw: &str) -> Result<ContactId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("contact id cannot be empty"));
    }
    ContactId::from_str(trimmed).map_err(|_| invalid_input("invalid contact id"))
}

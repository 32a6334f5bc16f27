use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use tripmode_config::AppConfig;
use tripmode_import::{CsvColumnMapping, UploadPolicy};
use tripmode_store::Store;

pub mod completions;
pub mod contacts;
pub mod import;
pub mod matching;
pub mod users;
pub mod validate;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn upload_policy(config: &AppConfig) -> UploadPolicy {
    UploadPolicy {
        max_size_bytes: config.import.max_file_size_bytes,
        accepted_extensions: config.import.accepted_extensions.clone(),
    }
}

/// CLI column flags override the configured ones, field by field.
#[derive(Debug, Default, clap::Args)]
pub struct ColumnArgs {
    /// Header of the column holding contact names
    #[arg(long, value_name = "HEADER")]
    pub name_column: Option<String>,
    /// Header of the column holding email addresses
    #[arg(long, value_name = "HEADER")]
    pub email_column: Option<String>,
    /// Header of the column holding phone numbers
    #[arg(long, value_name = "HEADER")]
    pub phone_column: Option<String>,
}

impl ColumnArgs {
    pub fn mapping(self, config: &AppConfig) -> CsvColumnMapping {
        let configured = &config.import.csv;
        CsvColumnMapping {
            name_column: self.name_column.or_else(|| configured.name_column.clone()),
            email_column: self.email_column.or_else(|| configured.email_column.clone()),
            phone_column: self.phone_column.or_else(|| configured.phone_column.clone()),
        }
    }
}

pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

use crate::commands::{print_json, print_warnings, upload_policy, ColumnArgs};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tripmode_config::AppConfig;
use tripmode_core::rules::{validate_contacts, ContactValidation};
use tripmode_import::{parse_contact_file, validate_upload, LocalFile};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    pub file: PathBuf,
    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Debug, Serialize)]
struct ValidateReport {
    #[serde(flatten)]
    validation: ContactValidation,
    skipped: usize,
    warnings: Vec<String>,
}

pub fn validate_file(json: bool, config: &AppConfig, args: ValidateArgs) -> Result<()> {
    let file = LocalFile::new(args.file.clone());
    validate_upload(&file, &upload_policy(config))
        .with_context(|| format!("check {}", args.file.display()))?;
    let parsed = parse_contact_file(&file, &args.columns.mapping(config))
        .with_context(|| format!("parse {}", args.file.display()))?;

    let report = ValidateReport {
        validation: validate_contacts(parsed.contacts),
        skipped: parsed.skipped,
        warnings: parsed.warnings,
    };
    if json {
        return print_json(&report);
    }

    print_warnings(&report.warnings);
    for contact in &report.validation.valid {
        println!("ok\t{}", contact.name);
    }
    for invalid in &report.validation.invalid {
        println!("invalid\t{}\t{}", invalid.contact.name, invalid.reason);
    }
    println!(
        "{} valid, {} invalid, {} skipped",
        report.validation.valid.len(),
        report.validation.invalid.len(),
        report.skipped
    );
    Ok(())
}

use crate::commands::{print_json, print_warnings, upload_policy, ColumnArgs, Context};
use crate::error::invalid_input;
use crate::util::{now_utc, resolve_owner};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tripmode_config::AppConfig;
use tripmode_core::domain::{prepare_contacts_for_save, OwnerId, ParsedContact};
use tripmode_import::macos::MacosContactsManager;
use tripmode_import::picker::import_method_description;
use tripmode_import::{
    parse_contact_file, pick_contacts, validate_upload, ContactFile, ContactFileKind,
    ContactsManager, ImportError, LocalFile,
};
use tripmode_store::matching::{match_owner_contacts, MatchReport};

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Import a CSV or vCard file
    File(ImportFileArgs),
    /// Import from the platform contact picker
    Picker(ImportPickerArgs),
    /// Show which import method this machine supports
    Method,
}

#[derive(Debug, Args)]
pub struct ImportFileArgs {
    pub file: PathBuf,
    #[arg(long)]
    pub owner: Option<String>,
    /// Parse and report without saving anything
    #[arg(long)]
    pub dry_run: bool,
    #[command(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Debug, Args)]
pub struct ImportPickerArgs {
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ContactFileKind>,
    dry_run: bool,
    found: usize,
    saved: usize,
    matched: usize,
    skipped: usize,
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    contacts: Vec<ParsedContact>,
}

pub fn import_file(ctx: &Context<'_>, args: ImportFileArgs) -> Result<()> {
    let owner = resolve_owner(args.owner.as_deref(), ctx.config)?;
    let file = LocalFile::new(args.file.clone());
    validate_upload(&file, &upload_policy(ctx.config))
        .with_context(|| format!("check {}", args.file.display()))?;

    let mapping = args.columns.mapping(ctx.config);
    let parsed = parse_contact_file(&file, &mapping)
        .with_context(|| format!("import {}", args.file.display()))?;

    let mut report = ImportReport {
        source: args.file.display().to_string(),
        kind: ContactFileKind::from_file_name(file.name()),
        dry_run: args.dry_run,
        found: parsed.contacts.len(),
        saved: 0,
        matched: 0,
        skipped: parsed.skipped,
        warnings: parsed.warnings,
        contacts: Vec::new(),
    };
    save_contacts(ctx, &owner, parsed.contacts, &mut report)?;
    emit_report(ctx, &report)
}

pub fn import_picker(ctx: &Context<'_>, args: ImportPickerArgs) -> Result<()> {
    let owner = resolve_owner(args.owner.as_deref(), ctx.config)?;
    let manager = MacosContactsManager::detect(ctx.config.import.macos_group.clone());
    let manager = manager.as_ref().map(|m| m as &dyn ContactsManager);

    let contacts = match pick_contacts(manager) {
        Ok(contacts) => contacts,
        Err(ImportError::CapabilityUnavailable) => {
            let fallback = import_method_description(None);
            return Err(invalid_input(format!(
                "contact picker is not available here; {} with `tripmode import file <PATH>`",
                fallback.title.to_lowercase()
            )));
        }
        Err(err) => return Err(err).context("pick contacts"),
    };

    let mut report = ImportReport {
        source: "picker".to_string(),
        kind: None,
        dry_run: args.dry_run,
        found: contacts.len(),
        saved: 0,
        matched: 0,
        skipped: 0,
        warnings: Vec::new(),
        contacts: Vec::new(),
    };
    save_contacts(ctx, &owner, contacts, &mut report)?;
    emit_report(ctx, &report)
}

fn save_contacts(
    ctx: &Context<'_>,
    owner: &OwnerId,
    contacts: Vec<ParsedContact>,
    report: &mut ImportReport,
) -> Result<()> {
    if report.dry_run {
        report.contacts = contacts;
        return Ok(());
    }

    let rows = prepare_contacts_for_save(&contacts);
    let ids = ctx
        .store
        .contacts()
        .add_many(now_utc(), owner, &rows)
        .with_context(|| format!("save contacts for {owner}"))?;
    report.saved = ids.len();

    record_matching(report, match_owner_contacts(ctx.store, owner));
    info!(owner = %owner, saved = report.saved, matched = report.matched, "contacts imported");
    Ok(())
}

/// Saved contacts stay saved when matching fails; the failure becomes a warning.
fn record_matching(
    report: &mut ImportReport,
    result: tripmode_store::error::Result<MatchReport>,
) {
    match result {
        Ok(matches) => report.matched = matches.matched,
        Err(err) => {
            warn!(error = %err, saved = report.saved, "user matching failed after save");
            report.warnings.push(format!(
                "contacts were saved but user matching failed: {err}; run `tripmode match` to retry"
            ));
        }
    }
}

fn emit_report(ctx: &Context<'_>, report: &ImportReport) -> Result<()> {
    if ctx.json {
        return print_json(report);
    }

    print_warnings(&report.warnings);
    if report.dry_run {
        for contact in &report.contacts {
            let email = contact.email.as_deref().unwrap_or("-");
            let phone = contact.phone.as_deref().unwrap_or("-");
            println!("{}\t{}\t{}", contact.name, email, phone);
        }
        println!(
            "dry run: {} contacts found, {} skipped",
            report.found, report.skipped
        );
    } else {
        println!(
            "imported {} contacts from {} ({} skipped, {} matched to users)",
            report.saved, report.source, report.skipped, report.matched
        );
    }
    Ok(())
}

pub fn describe_method(json: bool, config: &AppConfig) -> Result<()> {
    let manager = MacosContactsManager::detect(config.import.macos_group.clone());
    let description =
        import_method_description(manager.as_ref().map(|m| m as &dyn ContactsManager));
    if json {
        return print_json(&description);
    }
    println!("{}: {}", description.title, description.description);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripmode_store::error::StoreError;

    fn saved_report() -> ImportReport {
        ImportReport {
            source: "people.csv".to_string(),
            kind: Some(ContactFileKind::Csv),
            dry_run: false,
            found: 2,
            saved: 2,
            matched: 0,
            skipped: 0,
            warnings: Vec::new(),
            contacts: Vec::new(),
        }
    }

    #[test]
    fn record_matching_counts_matches() {
        let mut report = saved_report();
        record_matching(&mut report, Ok(MatchReport { checked: 2, matched: 1 }));
        assert_eq!(report.matched, 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn record_matching_failure_keeps_saved_count_and_warns() {
        let mut report = saved_report();
        record_matching(
            &mut report,
            Err(StoreError::Migration("users table missing".to_string())),
        );
        assert_eq!(report.saved, 2);
        assert_eq!(report.matched, 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("contacts were saved"));
        assert!(report.warnings[0].contains("tripmode match"));
    }
}

use crate::commands::{print_json, Context};
use crate::util::resolve_owner;
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use tripmode_store::matching::match_owner_contacts;

#[derive(Debug, Args)]
pub struct MatchArgs {
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchOutput {
    owner: String,
    checked: usize,
    matched: usize,
}

pub fn match_contacts(ctx: &Context<'_>, args: MatchArgs) -> Result<()> {
    let owner = resolve_owner(args.owner.as_deref(), ctx.config)?;
    let report = match_owner_contacts(ctx.store, &owner)
        .with_context(|| format!("match contacts for {owner}"))?;

    if ctx.json {
        return print_json(&MatchOutput {
            owner: owner.to_string(),
            checked: report.checked,
            matched: report.matched,
        });
    }
    println!(
        "{} of {} contacts matched to registered users",
        report.matched, report.checked
    );
    Ok(())
}

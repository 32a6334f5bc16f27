use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{format_timestamp_datetime, parse_contact_id, resolve_owner};
use anyhow::Result;
use clap::{Args, Subcommand};
use tripmode_store::error::StoreErrorKind;

#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// List an owner's saved contacts
    List(ListArgs),
    Delete(DeleteArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

pub fn list_contacts(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let owner = resolve_owner(args.owner.as_deref(), ctx.config)?;
    let contacts = ctx.store.contacts().list_for_owner(&owner)?;
    if ctx.json {
        return print_json(&contacts);
    }

    for contact in contacts {
        let email = contact.email.as_deref().unwrap_or("-");
        let phone = contact.phone.as_deref().unwrap_or("-");
        let user = contact
            .matched_user_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}  {}  {}  {}  user:{}  added {}",
            contact.id,
            contact.name,
            email,
            phone,
            user,
            format_timestamp_datetime(contact.created_at)
        );
    }
    Ok(())
}

pub fn delete_contact(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_contact_id(&args.id)?;
    match ctx.store.contacts().delete(id) {
        Ok(()) => {}
        Err(err) if err.kind() == StoreErrorKind::NotFound => {
            return Err(not_found(format!("contact {id}")));
        }
        Err(err) => return Err(err.into()),
    }
    if ctx.json {
        return print_json(&serde_json::json!({ "deleted": id }));
    }
    println!("deleted {id}");
    Ok(())
}

use crate::commands::{print_json, Context};
use crate::util::now_utc;
use anyhow::Result;
use clap::{Args, Subcommand};
use tripmode_core::domain::UserProfile;
use tripmode_store::repo::UserNew;

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Register a user that contacts can be matched against
    Add(AddUserArgs),
    List,
}

#[derive(Debug, Args)]
pub struct AddUserArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

pub fn add_user(ctx: &Context<'_>, args: AddUserArgs) -> Result<()> {
    let user = ctx.store.users().create(
        now_utc(),
        UserNew {
            name: args.name,
            email: args.email,
            phone: args.phone,
        },
    )?;
    if ctx.json {
        return print_json(&user);
    }
    println!("{}  {}", user.id, user.name);
    Ok(())
}

pub fn list_users(ctx: &Context<'_>) -> Result<()> {
    let users = ctx.store.users().list()?;
    if ctx.json {
        return print_json(&users);
    }
    for user in &users {
        print_user(user);
    }
    Ok(())
}

fn print_user(user: &UserProfile) {
    println!(
        "{}  {}  {}  {}",
        user.id,
        user.name,
        user.email.as_deref().unwrap_or("-"),
        user.phone.as_deref().unwrap_or("-")
    );
}

//! User lookup command handlers.

use anyhow::{Context, Result};
use taskflow_core::clients::auth;

use super::super::AppContext;

pub async fn search(ctx: &AppContext, term: &str) -> Result<()> {
    ctx.require_login()?;

    let users = auth::search_users(&ctx.api, term)
        .await
        .context("search users")?;

    if users.is_empty() {
        println!("No users found.");
    } else {
        for user in users {
            let name = format!("{} {}", user.firstname, user.lastname);
            println!(
                "{:>6}  {}  {}  {}",
                user.id,
                user.username,
                user.email,
                name.trim()
            );
        }
    }
    Ok(())
}

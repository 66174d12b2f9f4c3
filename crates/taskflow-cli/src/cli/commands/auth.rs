//! Session command handlers: login, logout, whoami, register.

use anyhow::{Context, Result};
use taskflow_core::SessionState;
use taskflow_core::clients::auth;
use taskflow_core::forms::{LoginForm, RegisterForm};

use super::super::AppContext;

pub async fn login(ctx: &AppContext, username: String, password: String) -> Result<()> {
    let form = LoginForm { username, password };
    form.validate()?;

    let session = ctx
        .session
        .login(&ctx.api, &form)
        .await
        .context("login failed")?;

    println!("Logged in as {}", session.user.username);
    println!("Session valid until {}", session.expires_at);
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout();
    println!("Logged out.");
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.session.state() {
        SessionState::Authenticated(session) => {
            let user = &session.user;
            println!("{}  (id {})", user.username, user.id);
            if !user.email.is_empty() {
                println!("email: {}", user.email);
            }
            let fullname = format!("{} {}", user.firstname, user.lastname);
            if !fullname.trim().is_empty() {
                println!("name:  {}", fullname.trim());
            }
            if !user.role.is_empty() {
                println!("role:  {}", user.role);
            }
            Ok(())
        }
        SessionState::Loading | SessionState::Anonymous => {
            anyhow::bail!("Not logged in. Run 'taskflow login' first.")
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn register(
    ctx: &AppContext,
    username: String,
    email: String,
    password: String,
    confirm_password: String,
    firstname: String,
    lastname: String,
) -> Result<()> {
    let form = RegisterForm {
        username,
        email,
        password,
        confirm_password,
        firstname,
        lastname,
    };
    // Validation failures stop here; the request is never built.
    form.validate()?;

    let created = auth::register(&ctx.api, &form.into_payload())
        .await
        .context("register failed")?;

    println!("Registered {} (id {})", created.username, created.id);
    println!("Run 'taskflow login' to start a session.");
    Ok(())
}

//! Sign-in, sign-out and current user

use anyhow::Result;
use colored::Colorize;
use dialoguer::Password;
use helios_core::User;

use super::{get_context, print_json, signed_in_context};
use crate::output;

pub async fn login(email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => Password::new().with_prompt("Senha").interact()?,
    };

    let ctx = get_context()?;
    let user = ctx.session.login(email, &password).await?;
    greet(&user);
    Ok(())
}

pub async fn login_google(credential: &str) -> Result<()> {
    let ctx = get_context()?;
    let user = ctx.session.login_with_oauth(credential).await?;
    greet(&user);
    Ok(())
}

pub async fn register(name: &str, email: &str) -> Result<()> {
    let password = Password::new()
        .with_prompt("Senha")
        .with_confirmation("Confirme a senha", "As senhas não coincidem")
        .interact()?;

    let ctx = get_context()?;
    let user = ctx.session.register(name, email, &password).await?;
    greet(&user);
    Ok(())
}

pub async fn logout() -> Result<()> {
    let ctx = get_context()?;
    ctx.session.logout().await?;
    output::success("Signed out");
    Ok(())
}

pub async fn whoami(json: bool) -> Result<()> {
    let ctx = signed_in_context().await?;
    let Some(user) = ctx.session.current_user() else {
        anyhow::bail!("Not signed in. Run 'helios login' first.");
    };

    if json {
        return print_json(&user);
    }

    println!("{}", user.name.bold());
    let mut rows = vec![
        ("Email", user.email.clone()),
        ("Role", format!("{:?}", user.role).to_lowercase()),
        ("Member since", output::date(&user.created_at)),
    ];
    if let Some(phone) = &user.phone {
        rows.push(("Phone", phone.clone()));
    }
    if let Some(last_login) = &user.last_login {
        rows.push(("Last login", output::date(last_login)));
    }
    println!("{}", output::summary_table(&rows));
    Ok(())
}

fn greet(user: &User) {
    output::success(&format!("Signed in as {} <{}>", user.name, user.email));
    if user.is_admin() {
        output::info("Administrator access enabled");
    }
}

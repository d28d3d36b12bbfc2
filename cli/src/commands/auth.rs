//! Session commands: login, register, logout and password recovery.

use anyhow::{Context as _, Result, bail};
use chaos_business::{RegisterRequest, Route, SessionPhase, TokenTier};
use inquire::Text;
use tracing::{info, instrument};

use crate::context::AppContext;

fn prompt_password(label: &str) -> Result<String> {
    rpassword::prompt_password(label).context("Failed to read password")
}

fn prompt_new_password() -> Result<String> {
    let password = prompt_password("New password: ")?;
    let confirm = prompt_password("Confirm password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    if password.is_empty() {
        bail!("Password cannot be empty");
    }
    Ok(password)
}

fn prompt_optional(label: &str) -> Result<Option<String>> {
    let value = Text::new(label)
        .with_help_message("Optional, press Enter to skip")
        .prompt()
        .with_context(|| format!("Failed to read {label}"))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

#[instrument(skip_all, name = "login")]
pub async fn run_login(ctx: &AppContext, email: Option<String>, remember: bool) -> Result<()> {
    ctx.out.header("Sign in");
    let email = match email {
        Some(email) => email,
        None => Text::new("Email:")
            .prompt()
            .context("Failed to read email")?,
    };
    let password = prompt_password("Password: ")?;
    login(ctx, &email, &password, remember).await
}

/// Signs in with known credentials.
pub async fn login(ctx: &AppContext, email: &str, password: &str, remember: bool) -> Result<()> {
    let session = &ctx.console.session;
    session.login(email, password, remember).await;
    ctx.report()?;

    let snapshot = session.snapshot();
    if snapshot.phase() != SessionPhase::Authenticated {
        bail!(
            "{}",
            snapshot.last_error().unwrap_or("Login did not complete")
        );
    }

    let name = snapshot
        .user()
        .map(|u| u.full_name.clone())
        .unwrap_or_else(|| email.to_owned());
    info!("Signed in as {email}");
    ctx.out.success(format!("Signed in as {name}"));
    if session.transport().tokens().active_tier() != Some(TokenTier::Persistent) {
        ctx.out
            .dim("Session not remembered; it ends with this command. Use --remember to keep it.");
    }
    Ok(())
}

#[instrument(skip_all, name = "register")]
pub async fn run_register(ctx: &AppContext, remember: bool) -> Result<()> {
    ctx.out.header("Create an account");
    let full_name = Text::new("Full name:")
        .prompt()
        .context("Failed to read full name")?;
    let email = Text::new("Email:")
        .prompt()
        .context("Failed to read email")?;
    let password = prompt_new_password()?;
    let working_position = prompt_optional("Position:")?;
    let company = prompt_optional("Company:")?;

    register(
        ctx,
        RegisterRequest {
            full_name,
            email,
            password,
            working_position,
            company,
        },
        remember,
    )
    .await
}

pub async fn register(ctx: &AppContext, request: RegisterRequest, remember: bool) -> Result<()> {
    let session = &ctx.console.session;
    session.register(request, remember).await;
    ctx.report()?;

    match session.route() {
        Route::EmailPending { message } => {
            ctx.out.success("Account created");
            ctx.out.info(message);
            Ok(())
        }
        _ => bail!(
            "{}",
            session
                .snapshot()
                .last_error()
                .unwrap_or("Registration did not complete")
        ),
    }
}

pub fn run_logout(ctx: &AppContext) {
    let was_signed_in = ctx.console.session.is_authenticated();
    ctx.console.session.logout();
    if was_signed_in {
        ctx.out.success("Signed out");
    } else {
        ctx.out.dim("Not currently signed in.");
    }
}

#[instrument(skip_all, name = "forgot_password")]
pub async fn run_forgot_password(ctx: &AppContext, email: &str) -> Result<()> {
    ctx.console.session.forgot_password(email).await;
    ctx.report()
}

#[instrument(skip_all, name = "reset_password")]
pub async fn run_reset_password(ctx: &AppContext, token: &str, email: &str) -> Result<()> {
    ctx.console.session.navigate(Route::ResetPassword {
        token: token.to_owned(),
        email: email.to_owned(),
    });
    let password = prompt_new_password()?;
    reset_password(ctx, token, email, &password).await
}

pub async fn reset_password(
    ctx: &AppContext,
    token: &str,
    email: &str,
    new_password: &str,
) -> Result<()> {
    ctx.console
        .session
        .reset_password(token, email, new_password)
        .await;
    ctx.report()
}

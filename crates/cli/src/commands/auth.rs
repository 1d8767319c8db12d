//! Session commands: login, register, logout, whoami.

use secrecy::SecretString;

use super::{CliError, Context};

/// Log in and persist the session.
///
/// # Errors
///
/// Returns an error if configuration fails or the server rejects the
/// credentials.
pub async fn login(email: &str, password: SecretString) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    let user = ctx.session.login(email, &password).await?;

    tracing::info!(
        username = %user.username,
        role = %user.role,
        "Logged in"
    );
    Ok(())
}

/// Register a new account and persist the implicit session.
///
/// # Errors
///
/// Returns an error if configuration fails or the server rejects the
/// registration (duplicate username/email, weak password).
pub async fn register(
    username: &str,
    email: &str,
    password: SecretString,
    display_name: Option<String>,
) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    let user = ctx
        .session
        .register(username, email, &password, display_name)
        .await?;

    tracing::info!(
        username = %user.username,
        email = %user.email,
        "Registered and logged in"
    );
    Ok(())
}

/// End the session. Always succeeds locally, whatever the server says.
///
/// # Errors
///
/// Returns an error only if configuration fails.
pub async fn logout() -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    ctx.session.logout().await;

    tracing::info!("Logged out");
    Ok(())
}

/// Show the current identity, refreshed from the server.
///
/// # Errors
///
/// Returns an error only if configuration fails.
pub async fn whoami() -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    ctx.session.reload_identity().await;

    match ctx.session.identity().await {
        Some(user) => {
            tracing::info!(
                id = %user.id,
                username = %user.username,
                email = %user.email,
                role = %user.role,
                rating = user.rating,
                sales = user.total_sales,
                "Authenticated"
            );
        }
        None => tracing::info!("Not logged in"),
    }
    Ok(())
}

//! Admin account commands.

use catalogo_admin::routes::admins::SELF_TOGGLE_MESSAGE;
use catalogo_core::AdminId;
use catalogo_core::format::format_date_short;
use catalogo_core::validation::AdminForm;

use super::{CliError, Connection, emit, read_line};

/// Print one line per admin account.
pub async fn list(conn: &Connection) -> Result<(), CliError> {
    let admins = conn.api.admins(&conn.token).await?;

    for admin in &admins {
        let marker = if admin.id == conn.admin.id { " (tú)" } else { "" };
        let status = if admin.is_active() { "activo" } else { "inactivo" };
        let created = admin.created().map(format_date_short).unwrap_or_default();
        emit(&format!(
            "{:>4}  {:<30}  {:<24}  {:<8}  {}",
            admin.id.as_i64(),
            admin.email,
            format!("{}{marker}", admin.name),
            status,
            created
        ));
    }
    tracing::info!("{} admin(s)", admins.len());
    Ok(())
}

/// Create an account; the password comes from stdin.
pub async fn create(conn: &Connection, email: &str, name: &str) -> Result<(), CliError> {
    let form = AdminForm {
        email: email.to_owned(),
        name: name.to_owned(),
        password: read_line().await?,
    };
    let payload = form.validate_create()?;

    let admin = conn.api.create_admin(&conn.token, &payload).await?;
    tracing::info!("Admin created: {} <{}> (id {})", admin.name, admin.email, admin.id);
    Ok(())
}

/// Replace an account's password; the new one comes from stdin.
pub async fn change_password(conn: &Connection, id: AdminId) -> Result<(), CliError> {
    let form = AdminForm {
        password: read_line().await?,
        ..AdminForm::default()
    };
    let payload = form.validate_password_change()?;

    conn.api
        .change_admin_password(&conn.token, id, &payload)
        .await?;
    tracing::info!("Password updated for admin {id}");
    Ok(())
}

/// Flip an account's active flag. The logged-in account cannot toggle itself.
pub async fn toggle(conn: &Connection, id: AdminId) -> Result<(), CliError> {
    if id == conn.admin.id {
        return Err(CliError::Refused(SELF_TOGGLE_MESSAGE.to_owned()));
    }

    let admin = conn.api.toggle_admin(&conn.token, id).await?;
    let state = if admin.is_active() { "activado" } else { "desactivado" };
    tracing::info!("{} fue {state}", admin.name);
    Ok(())
}

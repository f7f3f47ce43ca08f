//! Audit log command.

use catalogo_core::format::format_datetime_short;

use super::{CliError, Connection, emit};

/// Print one page of the audit log, newest first.
pub async fn show(conn: &Connection, page: u32) -> Result<(), CliError> {
    let log = conn.api.audit(&conn.token, page).await?;

    if log.logs.is_empty() {
        emit("No hay entradas en la bitácora");
        return Ok(());
    }

    for entry in &log.logs {
        emit(&format!(
            "{:<16}  {:<28}  {:<8}  {:<20}  {}",
            entry.created().map(format_datetime_short).unwrap_or_default(),
            entry.admin_email.as_deref().unwrap_or("—"),
            entry.action.to_string(),
            entry.entity_label(),
            entry.details_label(),
        ));
    }
    tracing::info!(
        "Page {} of {} ({} entries)",
        log.current_page.max(1),
        log.pages.max(1),
        log.total
    );
    Ok(())
}

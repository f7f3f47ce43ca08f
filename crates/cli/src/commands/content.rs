//! Site content commands.

use std::path::Path;

use catalogo_admin::backend::BackendError;

use super::{CliError, Connection, emit, read_all};

/// Print a content block. A key that was never saved prints nothing.
pub async fn get(conn: &Connection, key: &str) -> Result<(), CliError> {
    match conn.api.site_content(key).await {
        Ok(content) => emit(&content.content),
        Err(BackendError::NotFound(_)) => tracing::warn!("No content saved under '{key}'"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Replace a content block with the file's text, or stdin's.
pub async fn set(conn: &Connection, key: &str, file: Option<&Path>) -> Result<(), CliError> {
    let text = match file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => read_all().await?,
    };

    let saved = conn
        .api
        .update_site_content(&conn.token, key, &text)
        .await?;
    tracing::info!(
        "Saved '{}' ({} characters)",
        saved.key,
        saved.content.chars().count()
    );
    Ok(())
}

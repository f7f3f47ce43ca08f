//! Audit log viewer.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use catalogo_core::{AuditEntry, Pager, format};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, load_failure};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::{Layout, PaginationView, parse_param, render};
use crate::state::AppState;

const PATH: &str = "/admin/bitacora";

/// One row of the log.
#[derive(Debug, Clone)]
pub struct AuditRow {
    pub date: String,
    pub admin: String,
    pub action: String,
    pub badge_class: &'static str,
    pub entity: String,
    pub details: String,
    pub ip: String,
}

impl From<&AuditEntry> for AuditRow {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            date: entry
                .created()
                .map_or_else(|| "—".to_string(), format::format_datetime_short),
            admin: entry
                .admin_email
                .clone()
                .or_else(|| entry.admin_id.map(|id| format!("#{id}")))
                .unwrap_or_else(|| "—".to_string()),
            action: entry.action.to_string(),
            badge_class: entry.action.badge_class(),
            entity: entry.entity_label(),
            details: entry.details_label(),
            ip: entry.ip_address.clone().unwrap_or_else(|| "—".to_string()),
        }
    }
}

/// Audit page template.
#[derive(Template)]
#[template(path = "audit.html")]
pub struct AuditTemplate {
    pub layout: Layout,
    pub rows: Vec<AuditRow>,
    pub total: u64,
    pub pagination: PaginationView,
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditParams {
    pub page: Option<String>,
}

/// Audit log, 50 entries per page, newest first.
#[instrument(skip(auth, state, session))]
pub async fn index(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<AuditParams>,
) -> Result<Html<String>> {
    let page = parse_param(params.page.as_deref()).unwrap_or(1).max(1);

    let (rows, total, pagination, error) = match state.api().audit(&auth.token, page).await {
        Ok(log) => {
            let current = if log.current_page == 0 { page } else { log.current_page };
            let pager = Pager::new(current, log.pages);
            (
                log.logs.iter().map(AuditRow::from).collect(),
                log.total,
                PaginationView::new(&pager, |n| format!("{PATH}?page={n}")),
                None,
            )
        }
        Err(e) => (
            Vec::new(),
            0,
            PaginationView::default(),
            Some(load_failure(e, "Error al cargar la bitácora")?),
        ),
    };

    Ok(render(&AuditTemplate {
        layout: Layout::new(&auth, &session, PATH).await,
        rows,
        total,
        pagination,
        error,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_rows_show_session_label() {
        let entry: AuditEntry = serde_json::from_value(serde_json::json!({
            "id": 1,
            "admin_id": 4,
            "admin_email": "ana@pisoskermy.com",
            "action": "LOGIN",
            "entity": "admin",
            "entity_id": 4,
            "details": null,
            "ip_address": "10.0.0.2",
            "created_at": "2024-03-05T14:30:00"
        }))
        .unwrap();

        let row = AuditRow::from(&entry);
        assert_eq!(row.entity, "Iniciar sesión");
        assert_eq!(row.badge_class, "badge-primary");
        assert_eq!(row.admin, "ana@pisoskermy.com");
        assert_eq!(row.date, "05/03/2024 14:30");
    }

    #[test]
    fn test_object_details_are_compact_json() {
        let entry: AuditEntry = serde_json::from_value(serde_json::json!({
            "id": 2,
            "admin_id": null,
            "action": "UPDATE",
            "entity": "product",
            "entity_id": 9,
            "details": {"name": "Porcelanato"}
        }))
        .unwrap();

        let row = AuditRow::from(&entry);
        assert_eq!(row.entity, "product #9");
        assert_eq!(row.details, r#"{"name":"Porcelanato"}"#);
        assert_eq!(row.admin, "—");
        assert_eq!(row.ip, "—");
    }
}

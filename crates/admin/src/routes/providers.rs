//! Providers: names plus contact details.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use catalogo_core::validation::ProviderForm;
use catalogo_core::{Provider, ProviderId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, load_failure, save_failure};
use crate::filters;
use crate::flash;
use crate::middleware::{AdminSession, RequireAdminAuth};
use crate::models::Flash;
use crate::routes::taxonomy::ListParams;
use crate::routes::{Layout, parse_param, render};
use crate::state::AppState;

const PATH: &str = "/admin/proveedores";

/// One row of the provider table.
#[derive(Debug, Clone)]
pub struct ProviderRow {
    pub id: ProviderId,
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub description: String,
    pub is_editing: bool,
    pub edit: ProviderForm,
}

impl From<Provider> for ProviderRow {
    fn from(provider: Provider) -> Self {
        let edit = ProviderForm {
            name: provider.name.clone(),
            contact: provider.contact.clone().unwrap_or_default(),
            phone: provider.phone.clone().unwrap_or_default(),
            description: provider.description.clone().unwrap_or_default(),
        };
        Self {
            id: provider.id,
            name: provider.name,
            contact: provider.contact.unwrap_or_default(),
            phone: provider.phone.unwrap_or_default(),
            description: provider.description.unwrap_or_default(),
            is_editing: false,
            edit,
        }
    }
}

/// Providers page template.
#[derive(Template)]
#[template(path = "providers.html")]
pub struct ProvidersTemplate {
    pub layout: Layout,
    pub rows: Vec<ProviderRow>,
    pub new_provider: ProviderForm,
    pub error: Option<String>,
    pub load_error: Option<String>,
}

async fn page(
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    editing: Option<ProviderId>,
    form: Option<ProviderForm>,
    error: Option<String>,
) -> Result<Html<String>> {
    let (mut rows, load_error) = match state.api().providers(&auth.token).await {
        Ok(providers) => (providers.into_iter().map(ProviderRow::from).collect::<Vec<_>>(), None),
        Err(e) => (Vec::new(), Some(load_failure(e, "Error al cargar proveedores")?)),
    };

    let mut new_provider = ProviderForm::default();
    match editing {
        Some(id) => {
            for row in rows.iter_mut().filter(|row| row.id == id) {
                row.is_editing = true;
                if let Some(form) = &form {
                    row.edit = form.clone();
                }
            }
        }
        None => new_provider = form.unwrap_or_default(),
    }

    Ok(render(&ProvidersTemplate {
        layout: Layout::new(auth, session, PATH).await,
        rows,
        new_provider,
        error,
        load_error,
    }))
}

/// Provider list.
#[instrument(skip(auth, state, session))]
pub async fn index(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Result<Html<String>> {
    let editing = parse_param(params.editar.as_deref());
    page(&auth, &state, &session, editing, None, None).await
}

/// Create a provider.
#[instrument(skip(auth, state, session, form))]
pub async fn create(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProviderForm>,
) -> Result<Response> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(e) => {
            return Ok(page(&auth, &state, &session, None, Some(form), Some(e.to_string()))
                .await?
                .into_response());
        }
    };

    match state.api().create_provider(&auth.token, &payload).await {
        Ok(provider) => {
            tracing::info!(provider_id = %provider.id, "Provider created");
            flash::push(&session, Flash::success("Proveedor creado")).await;
            Ok(Redirect::to(PATH).into_response())
        }
        Err(e) => {
            let message = save_failure(e, "Error al guardar proveedor")?;
            Ok(page(&auth, &state, &session, None, Some(form), Some(message))
                .await?
                .into_response())
        }
    }
}

/// Update a provider.
#[instrument(skip(auth, state, session, form))]
pub async fn update(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProviderId>,
    Form(form): Form<ProviderForm>,
) -> Result<Response> {
    let message = match form.validate() {
        Ok(payload) => match state.api().update_provider(&auth.token, id, &payload).await {
            Ok(_) => {
                flash::push(&session, Flash::success("Proveedor actualizado")).await;
                return Ok(Redirect::to(PATH).into_response());
            }
            Err(e) => save_failure(e, "Error al guardar proveedor")?,
        },
        Err(e) => e.to_string(),
    };

    Ok(page(&auth, &state, &session, Some(id), Some(form), Some(message))
        .await?
        .into_response())
}

/// Delete a provider.
#[instrument(skip(auth, state, session))]
pub async fn delete(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProviderId>,
) -> Result<Redirect> {
    let message = match state.api().delete_provider(&auth.token, id).await {
        Ok(()) => Flash::success("Proveedor eliminado"),
        Err(e) => Flash::error(save_failure(e, "Error al eliminar proveedor")?),
    };
    flash::push(&session, message).await;
    Ok(Redirect::to(PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_fills_blank_optional_fields() {
        let row = ProviderRow::from(Provider {
            id: ProviderId::new(3),
            name: "Cerámicas del Pacífico".to_string(),
            contact: None,
            phone: Some("2643-1333".to_string()),
            description: None,
        });
        assert_eq!(row.contact, "");
        assert_eq!(row.edit.phone, "2643-1333");
        assert!(!row.is_editing);
    }
}

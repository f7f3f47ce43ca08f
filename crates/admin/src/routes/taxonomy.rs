//! Categories and tags.
//!
//! Both are a bare list of names with the same create, inline-edit and
//! delete flow, so one set of handlers serves both through [`Taxonomy`].

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use catalogo_core::validation::NameForm;
use catalogo_core::{CategoryId, TagId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::{AdminApiClient, AuthToken, BackendError};
use crate::error::{Result, load_failure, save_failure};
use crate::filters;
use crate::flash;
use crate::middleware::{AdminSession, RequireAdminAuth};
use crate::models::Flash;
use crate::routes::{Layout, parse_param, render};
use crate::state::AppState;

/// Which list a page manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Categories,
    Tags,
}

/// Fixed texts of a taxonomy page.
#[derive(Debug, Clone, Copy)]
pub struct TaxonomyLabels {
    pub path: &'static str,
    pub title: &'static str,
    pub new_label: &'static str,
    pub placeholder: &'static str,
    pub empty: &'static str,
    pub confirm_delete: &'static str,
}

impl Taxonomy {
    #[must_use]
    pub const fn labels(self) -> TaxonomyLabels {
        match self {
            Self::Categories => TaxonomyLabels {
                path: "/admin/categorias",
                title: "Categorías",
                new_label: "Nueva categoría",
                placeholder: "Ej: Porcelanato",
                empty: "No hay categorias",
                confirm_delete: "¿Eliminar esta categoria?",
            },
            Self::Tags => TaxonomyLabels {
                path: "/admin/etiquetas",
                title: "Etiquetas",
                new_label: "Nueva etiqueta",
                placeholder: "Ej: Antideslizante",
                empty: "No hay etiquetas",
                confirm_delete: "¿Eliminar esta etiqueta?",
            },
        }
    }

    const fn load_error(self) -> &'static str {
        match self {
            Self::Categories => "Error al cargar categorias",
            Self::Tags => "Error al cargar etiquetas",
        }
    }

    const fn save_error(self) -> &'static str {
        match self {
            Self::Categories => "Error al guardar categoria",
            Self::Tags => "Error al guardar etiqueta",
        }
    }

    const fn delete_error(self) -> &'static str {
        match self {
            Self::Categories => "Error al eliminar categoria",
            Self::Tags => "Error al eliminar etiqueta",
        }
    }

    const fn done_message(self, verb: Verb) -> &'static str {
        match (self, verb) {
            (Self::Categories, Verb::Created) => "Categoría creada",
            (Self::Categories, Verb::Updated) => "Categoría actualizada",
            (Self::Categories, Verb::Deleted) => "Categoría eliminada",
            (Self::Tags, Verb::Created) => "Etiqueta creada",
            (Self::Tags, Verb::Updated) => "Etiqueta actualizada",
            (Self::Tags, Verb::Deleted) => "Etiqueta eliminada",
        }
    }

    async fn list(self, api: &AdminApiClient, token: &AuthToken) -> std::result::Result<Vec<NamedRow>, BackendError> {
        Ok(match self {
            Self::Categories => api
                .categories(token)
                .await?
                .into_iter()
                .map(|c| NamedRow::new(c.id.as_i64(), c.name))
                .collect(),
            Self::Tags => api
                .tags(token)
                .await?
                .into_iter()
                .map(|t| NamedRow::new(t.id.as_i64(), t.name))
                .collect(),
        })
    }

    async fn create(self, api: &AdminApiClient, token: &AuthToken, form: &NameForm) -> std::result::Result<(), BackendError> {
        match self {
            Self::Categories => api.create_category(token, form).await.map(drop),
            Self::Tags => api.create_tag(token, form).await.map(drop),
        }
    }

    async fn update(
        self,
        api: &AdminApiClient,
        token: &AuthToken,
        id: i64,
        form: &NameForm,
    ) -> std::result::Result<(), BackendError> {
        match self {
            Self::Categories => api
                .update_category(token, CategoryId::new(id), form)
                .await
                .map(drop),
            Self::Tags => api.update_tag(token, TagId::new(id), form).await.map(drop),
        }
    }

    async fn delete(self, api: &AdminApiClient, token: &AuthToken, id: i64) -> std::result::Result<(), BackendError> {
        match self {
            Self::Categories => api.delete_category(token, CategoryId::new(id)).await,
            Self::Tags => api.delete_tag(token, TagId::new(id)).await,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Created,
    Updated,
    Deleted,
}

/// One row of the list.
#[derive(Debug, Clone)]
pub struct NamedRow {
    pub id: i64,
    pub name: String,
    pub is_editing: bool,
    pub edit_value: String,
}

impl NamedRow {
    fn new(id: i64, name: String) -> Self {
        Self {
            id,
            edit_value: name.clone(),
            name,
            is_editing: false,
        }
    }
}

/// Form state carried into a render.
#[derive(Debug, Default)]
struct FormState {
    /// Row being edited inline.
    editing: Option<i64>,
    /// Value typed in the create form or the inline edit.
    value: Option<String>,
    error: Option<String>,
}

/// Categories / tags page template.
#[derive(Template)]
#[template(path = "taxonomy.html")]
pub struct TaxonomyTemplate {
    pub layout: Layout,
    pub labels: TaxonomyLabels,
    pub rows: Vec<NamedRow>,
    pub new_name: String,
    pub error: Option<String>,
    pub load_error: Option<String>,
}

/// `?editar={id}` opens the inline editor for that row.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub editar: Option<String>,
}

async fn page(
    kind: Taxonomy,
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    form: FormState,
) -> Result<Html<String>> {
    let labels = kind.labels();
    let (mut rows, load_error) = match kind.list(state.api(), &auth.token).await {
        Ok(rows) => (rows, None),
        Err(e) => (Vec::new(), Some(load_failure(e, kind.load_error())?)),
    };

    let mut new_name = String::new();
    match form.editing {
        Some(id) => {
            for row in rows.iter_mut().filter(|row| row.id == id) {
                row.is_editing = true;
                if let Some(value) = &form.value {
                    row.edit_value.clone_from(value);
                }
            }
        }
        None => new_name = form.value.unwrap_or_default(),
    }

    Ok(render(&TaxonomyTemplate {
        layout: Layout::new(auth, session, labels.path).await,
        labels,
        rows,
        new_name,
        error: form.error,
        load_error,
    }))
}

async fn index(
    kind: Taxonomy,
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    params: &ListParams,
) -> Result<Html<String>> {
    let form = FormState {
        editing: parse_param(params.editar.as_deref()),
        ..FormState::default()
    };
    page(kind, auth, state, session, form).await
}

async fn create(
    kind: Taxonomy,
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    form: NameForm,
) -> Result<Response> {
    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(e) => {
            let form = FormState {
                editing: None,
                value: Some(form.name),
                error: Some(e.to_string()),
            };
            return Ok(page(kind, auth, state, session, form).await?.into_response());
        }
    };

    match kind.create(state.api(), &auth.token, &payload).await {
        Ok(()) => {
            flash::push(session, Flash::success(kind.done_message(Verb::Created))).await;
            Ok(Redirect::to(kind.labels().path).into_response())
        }
        Err(e) => {
            let form = FormState {
                editing: None,
                value: Some(payload.name),
                error: Some(save_failure(e, kind.save_error())?),
            };
            Ok(page(kind, auth, state, session, form).await?.into_response())
        }
    }
}

async fn update(
    kind: Taxonomy,
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    id: i64,
    form: NameForm,
) -> Result<Response> {
    let result = match form.validate() {
        Ok(payload) => kind
            .update(state.api(), &auth.token, id, &payload)
            .await
            .map_err(|e| save_failure(e, kind.save_error())),
        Err(e) => Err(Ok(e.to_string())),
    };

    match result {
        Ok(()) => {
            flash::push(session, Flash::success(kind.done_message(Verb::Updated))).await;
            Ok(Redirect::to(kind.labels().path).into_response())
        }
        Err(message) => {
            let form = FormState {
                editing: Some(id),
                value: Some(form.name),
                error: Some(message?),
            };
            Ok(page(kind, auth, state, session, form).await?.into_response())
        }
    }
}

async fn delete(
    kind: Taxonomy,
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    id: i64,
) -> Result<Redirect> {
    let message = match kind.delete(state.api(), &auth.token, id).await {
        Ok(()) => Flash::success(kind.done_message(Verb::Deleted)),
        Err(e) => Flash::error(save_failure(e, kind.delete_error())?),
    };
    flash::push(session, message).await;
    Ok(Redirect::to(kind.labels().path))
}

// =============================================================================
// Categories
// =============================================================================

/// Category list.
#[instrument(skip(auth, state, session))]
pub async fn categories(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Result<Html<String>> {
    index(Taxonomy::Categories, &auth, &state, &session, &params).await
}

/// Create a category.
#[instrument(skip(auth, state, session, form))]
pub async fn create_category(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NameForm>,
) -> Result<Response> {
    create(Taxonomy::Categories, &auth, &state, &session, form).await
}

/// Rename a category.
#[instrument(skip(auth, state, session, form))]
pub async fn update_category(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
    Form(form): Form<NameForm>,
) -> Result<Response> {
    update(Taxonomy::Categories, &auth, &state, &session, id.as_i64(), form).await
}

/// Delete a category.
#[instrument(skip(auth, state, session))]
pub async fn delete_category(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CategoryId>,
) -> Result<Redirect> {
    delete(Taxonomy::Categories, &auth, &state, &session, id.as_i64()).await
}

// =============================================================================
// Tags
// =============================================================================

/// Tag list.
#[instrument(skip(auth, state, session))]
pub async fn tags(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
) -> Result<Html<String>> {
    index(Taxonomy::Tags, &auth, &state, &session, &params).await
}

/// Create a tag.
#[instrument(skip(auth, state, session, form))]
pub async fn create_tag(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NameForm>,
) -> Result<Response> {
    create(Taxonomy::Tags, &auth, &state, &session, form).await
}

/// Rename a tag.
#[instrument(skip(auth, state, session, form))]
pub async fn update_tag(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<TagId>,
    Form(form): Form<NameForm>,
) -> Result<Response> {
    update(Taxonomy::Tags, &auth, &state, &session, id.as_i64(), form).await
}

/// Delete a tag.
#[instrument(skip(auth, state, session))]
pub async fn delete_tag(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<TagId>,
) -> Result<Redirect> {
    delete(Taxonomy::Tags, &auth, &state, &session, id.as_i64()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_the_list() {
        assert_eq!(Taxonomy::Categories.labels().path, "/admin/categorias");
        assert_eq!(Taxonomy::Tags.labels().empty, "No hay etiquetas");
        assert_eq!(
            Taxonomy::Categories.labels().confirm_delete,
            "¿Eliminar esta categoria?"
        );
    }

    #[test]
    fn test_done_messages() {
        assert_eq!(
            Taxonomy::Tags.done_message(Verb::Deleted),
            "Etiqueta eliminada"
        );
        assert_eq!(
            Taxonomy::Categories.done_message(Verb::Created),
            "Categoría creada"
        );
    }
}

//! Administrator accounts.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use catalogo_core::validation::AdminForm;
use catalogo_core::{Admin, AdminId, format};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, load_failure, save_failure};
use crate::filters;
use crate::flash;
use crate::middleware::{AdminSession, RequireAdminAuth};
use crate::models::{CurrentAdmin, Flash, session_keys};
use crate::routes::{Layout, parse_param, render};
use crate::state::AppState;

const PATH: &str = "/admin/admins";

/// Refusal shown when an admin tries to deactivate their own account.
pub const SELF_TOGGLE_MESSAGE: &str = "No puedes desactivarte a ti mismo";

/// One row of the admin table.
#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub is_self: bool,
    pub created: String,
    pub is_editing: bool,
    pub is_changing_password: bool,
    pub edit_name: String,
    pub edit_email: String,
}

impl AdminRow {
    fn new(admin: Admin, current: AdminId) -> Self {
        Self {
            id: admin.id,
            is_active: admin.is_active(),
            is_self: admin.id == current,
            created: admin
                .created()
                .map_or_else(|| "—".to_string(), format::format_date_short),
            is_editing: false,
            is_changing_password: false,
            edit_name: admin.name.clone(),
            edit_email: admin.email.clone(),
            name: admin.name,
            email: admin.email,
        }
    }
}

/// Admins page template.
#[derive(Template)]
#[template(path = "admins.html")]
pub struct AdminsTemplate {
    pub layout: Layout,
    pub rows: Vec<AdminRow>,
    pub new_name: String,
    pub new_email: String,
    pub error: Option<String>,
    pub load_error: Option<String>,
}

/// `?editar={id}` opens the profile editor, `?password={id}` the password form.
#[derive(Debug, Default, Deserialize)]
pub struct AdminParams {
    pub editar: Option<String>,
    pub password: Option<String>,
}

/// Which inline form is open, with what was typed into it.
#[derive(Debug, Default)]
enum OpenForm {
    #[default]
    None,
    Create(AdminForm),
    Edit(AdminId, Option<AdminForm>),
    Password(AdminId),
}

async fn page(
    auth: &AdminSession,
    state: &AppState,
    session: &Session,
    open: OpenForm,
    error: Option<String>,
) -> Result<Html<String>> {
    let (mut rows, load_error) = match state.api().admins(&auth.token).await {
        Ok(admins) => (
            admins
                .into_iter()
                .map(|admin| AdminRow::new(admin, auth.admin.id))
                .collect::<Vec<_>>(),
            None,
        ),
        Err(e) => (Vec::new(), Some(load_failure(e, "Error al cargar administradores")?)),
    };

    let (mut new_name, mut new_email) = (String::new(), String::new());
    match open {
        OpenForm::None => {}
        OpenForm::Create(form) => {
            new_name = form.name;
            new_email = form.email;
        }
        OpenForm::Edit(id, form) => {
            for row in rows.iter_mut().filter(|row| row.id == id) {
                row.is_editing = true;
                if let Some(form) = &form {
                    row.edit_name.clone_from(&form.name);
                    row.edit_email.clone_from(&form.email);
                }
            }
        }
        OpenForm::Password(id) => {
            for row in rows.iter_mut().filter(|row| row.id == id) {
                row.is_changing_password = true;
            }
        }
    }

    Ok(render(&AdminsTemplate {
        layout: Layout::new(auth, session, PATH).await,
        rows,
        new_name,
        new_email,
        error,
        load_error,
    }))
}

/// Admin list.
#[instrument(skip(auth, state, session))]
pub async fn index(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<AdminParams>,
) -> Result<Html<String>> {
    let open = match (
        parse_param(params.editar.as_deref()),
        parse_param(params.password.as_deref()),
    ) {
        (Some(id), _) => OpenForm::Edit(id, None),
        (None, Some(id)) => OpenForm::Password(id),
        (None, None) => OpenForm::None,
    };
    page(&auth, &state, &session, open, None).await
}

/// Create an admin account.
#[instrument(skip(auth, state, session, form))]
pub async fn create(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AdminForm>,
) -> Result<Response> {
    let message = match form.validate_create() {
        Ok(payload) => match state.api().create_admin(&auth.token, &payload).await {
            Ok(admin) => {
                tracing::info!(admin_id = %admin.id, "Admin created");
                flash::push(&session, Flash::success("Administrador creado")).await;
                return Ok(Redirect::to(PATH).into_response());
            }
            Err(e) => save_failure(e, "Error al guardar administrador")?,
        },
        Err(e) => e.to_string(),
    };

    Ok(page(&auth, &state, &session, OpenForm::Create(form), Some(message))
        .await?
        .into_response())
}

/// Edit an admin's name and email.
#[instrument(skip(auth, state, session, form))]
pub async fn update(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AdminId>,
    Form(form): Form<AdminForm>,
) -> Result<Response> {
    let message = match form.validate_edit() {
        Ok(payload) => match state.api().update_admin(&auth.token, id, &payload).await {
            Ok(admin) => {
                // Keep the header in sync when editing our own profile
                if admin.id == auth.admin.id {
                    session
                        .insert(session_keys::ADMIN_DATA, CurrentAdmin::from(&admin))
                        .await?;
                }
                flash::push(&session, Flash::success("Administrador actualizado")).await;
                return Ok(Redirect::to(PATH).into_response());
            }
            Err(e) => save_failure(e, "Error al guardar administrador")?,
        },
        Err(e) => e.to_string(),
    };

    Ok(
        page(&auth, &state, &session, OpenForm::Edit(id, Some(form)), Some(message))
            .await?
            .into_response(),
    )
}

/// Change an admin's password.
#[instrument(skip(auth, state, session, form))]
pub async fn change_password(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AdminId>,
    Form(form): Form<AdminForm>,
) -> Result<Response> {
    let message = match form.validate_password_change() {
        Ok(payload) => match state
            .api()
            .change_admin_password(&auth.token, id, &payload)
            .await
        {
            Ok(()) => {
                flash::push(&session, Flash::success("Contraseña actualizada")).await;
                return Ok(Redirect::to(PATH).into_response());
            }
            Err(e) => save_failure(e, "Error al cambiar la contraseña")?,
        },
        Err(e) => e.to_string(),
    };

    Ok(page(&auth, &state, &session, OpenForm::Password(id), Some(message))
        .await?
        .into_response())
}

/// Activate or deactivate an admin.
///
/// Deactivating yourself is refused here, without calling the backend.
#[instrument(skip(auth, state, session))]
pub async fn toggle(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AdminId>,
) -> Result<Redirect> {
    if id == auth.admin.id {
        flash::push(&session, Flash::error(SELF_TOGGLE_MESSAGE)).await;
        return Ok(Redirect::to(PATH));
    }

    let message = match state.api().toggle_admin(&auth.token, id).await {
        Ok(admin) if admin.is_active() => Flash::success(format!("{} fue activado", admin.name)),
        Ok(admin) => Flash::success(format!("{} fue desactivado", admin.name)),
        Err(e) => Flash::error(save_failure(e, "Error al cambiar el estado")?),
    };
    flash::push(&session, message).await;
    Ok(Redirect::to(PATH))
}

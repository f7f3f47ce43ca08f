//! Editable site content (the About block).

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use catalogo_core::ABOUT_US_KEY;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::{Result, load_failure, save_failure};
use crate::filters;
use crate::flash;
use crate::middleware::RequireAdminAuth;
use crate::models::Flash;
use crate::routes::{Layout, render};
use crate::state::AppState;

const PATH: &str = "/admin/contenido";

/// Content page template.
#[derive(Template)]
#[template(path = "content.html")]
pub struct ContentTemplate {
    pub layout: Layout,
    pub content: String,
    pub error: Option<String>,
}

/// Posted content.
#[derive(Debug, Default, Deserialize)]
pub struct ContentForm {
    #[serde(default)]
    pub content: String,
}

/// Edit the About block. A key never saved starts empty.
#[instrument(skip(auth, state, session))]
pub async fn edit(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>> {
    let (content, error) = match state.api().site_content(ABOUT_US_KEY).await {
        Ok(block) => (block.content, None),
        Err(BackendError::NotFound(_)) => (String::new(), None),
        Err(e) => (String::new(), Some(load_failure(e, "Error al cargar contenido")?)),
    };

    Ok(render(&ContentTemplate {
        layout: Layout::new(&auth, &session, PATH).await,
        content,
        error,
    }))
}

/// Save the About block.
#[instrument(skip(auth, state, session, form), fields(len = form.content.len()))]
pub async fn save(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ContentForm>,
) -> Result<Response> {
    match state
        .api()
        .update_site_content(&auth.token, ABOUT_US_KEY, &form.content)
        .await
    {
        Ok(_) => {
            flash::push(&session, Flash::success("Contenido guardado")).await;
            Ok(Redirect::to(PATH).into_response())
        }
        Err(e) => {
            let error = save_failure(e, "Error al guardar contenido")?;
            Ok(render(&ContentTemplate {
                layout: Layout::new(&auth, &session, PATH).await,
                content: form.content,
                error: Some(error),
            })
            .into_response())
        }
    }
}

//! Product listing and the draft-backed product form.
//!
//! Opening "new" or "edit" creates a [`ProductDraft`] and redirects to its
//! form. Every button on the form posts the whole form back with an
//! `action`; the handler updates the draft's fields, applies the action to
//! its [`ImageSet`](catalogo_core::ImageSet) and redirects to the form again
//! until the action is `save`.

use std::str::FromStr;

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{Html, IntoResponse, Redirect, Response},
};
use catalogo_core::images::MAX_IMAGES;
use catalogo_core::validation::ProductFields;
use catalogo_core::{
    CategoryId, ImageError, ImageKey, MoveDirection, NewUpload, Pager, Product, ProductId,
    ProductImage, ProviderId, TagId, format,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;
use uuid::Uuid;

use crate::backend::{AdminApiClient, AdminProductQuery, AuthToken, BackendError};
use crate::drafts::ProductDraft;
use crate::error::{AppError, Result, load_failure, save_failure};
use crate::filters;
use crate::flash;
use crate::middleware::RequireAdminAuth;
use crate::models::Flash;
use crate::routes::{Layout, PaginationView, parse_param, render};
use crate::state::AppState;

const PATH: &str = "/admin/productos";

// =============================================================================
// Listing
// =============================================================================

/// Raw query parameters; empty `<select>` values mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    pub page: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub provider_id: Option<String>,
    pub search: Option<String>,
}

/// Filters applied to the listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
    pub provider_id: Option<ProviderId>,
    pub search: String,
}

impl ProductFilters {
    #[must_use]
    pub fn from_params(params: &ProductParams) -> Self {
        Self {
            category_id: parse_param(params.category_id.as_deref()),
            tag_id: parse_param(params.tag_id.as_deref()),
            provider_id: parse_param(params.provider_id.as_deref()),
            search: params.search.as_deref().unwrap_or_default().trim().to_string(),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.category_id.is_some()
            || self.tag_id.is_some()
            || self.provider_id.is_some()
            || !self.search.is_empty()
    }

    /// Backend query for `page`.
    #[must_use]
    pub fn query(&self, page: u32) -> AdminProductQuery {
        AdminProductQuery {
            page,
            category_id: self.category_id,
            tag_id: self.tag_id,
            provider_id: self.provider_id,
            search: Some(self.search.clone()).filter(|s| !s.is_empty()),
        }
    }

    /// Listing URL for `page` keeping the filters.
    #[must_use]
    pub fn href(&self, page: u32) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if page > 1 {
            query.append_pair("page", &page.to_string());
        }
        if let Some(id) = self.category_id {
            query.append_pair("category_id", &id.to_string());
        }
        if let Some(id) = self.tag_id {
            query.append_pair("tag_id", &id.to_string());
        }
        if let Some(id) = self.provider_id {
            query.append_pair("provider_id", &id.to_string());
        }
        if !self.search.is_empty() {
            query.append_pair("search", &self.search);
        }

        let query = query.finish();
        if query.is_empty() {
            PATH.to_string()
        } else {
            format!("{PATH}?{query}")
        }
    }
}

/// An entry in a `<select>`.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

impl OptionView {
    fn list<I: PartialEq + ToString>(items: impl IntoIterator<Item = (I, String)>, selected: &[I]) -> Vec<Self> {
        items
            .into_iter()
            .map(|(id, name)| Self {
                selected: selected.contains(&id),
                id: id.to_string(),
                name,
            })
            .collect()
    }
}

/// One row of the product table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub categories: String,
    pub tags: String,
    pub image_url: String,
}

impl ProductRow {
    fn new(product: &Product, api_base: &str) -> Self {
        let join = |names: Vec<&str>| {
            if names.is_empty() {
                "—".to_string()
            } else {
                names.join(", ")
            }
        };
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product
                .price
                .map_or_else(|| "—".to_string(), |price| price.display()),
            categories: join(product.categories.iter().map(|c| c.name.as_str()).collect()),
            tags: join(product.tags.iter().map(|t| t.name.as_str()).collect()),
            image_url: format::resolve_image_url(api_base, product.primary_image()),
        }
    }
}

/// Result count label.
#[must_use]
pub fn count_label(total: u64) -> String {
    if total == 1 {
        "1 producto encontrado".to_string()
    } else {
        format!("{total} productos encontrados")
    }
}

/// Product list template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub layout: Layout,
    pub rows: Vec<ProductRow>,
    pub count_label: String,
    pub categories: Vec<OptionView>,
    pub tags: Vec<OptionView>,
    pub providers: Vec<OptionView>,
    pub search: String,
    pub has_filters: bool,
    pub pagination: PaginationView,
    pub error: Option<String>,
}

/// Option list for a filter or form select; a failed load leaves it empty.
fn options_or_empty<T>(
    result: std::result::Result<Vec<T>, BackendError>,
    what: &str,
) -> Result<Vec<T>> {
    match result {
        Ok(items) => Ok(items),
        Err(BackendError::Unauthorized) => Err(AppError::Backend(BackendError::Unauthorized)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load {what}");
            Ok(Vec::new())
        }
    }
}

/// Product list with filters and pagination.
#[instrument(skip(auth, state, session))]
pub async fn index(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ProductParams>,
) -> Result<Html<String>> {
    let filters = ProductFilters::from_params(&params);
    let page = parse_param(params.page.as_deref()).unwrap_or(1).max(1);

    let api = state.api();
    let token = &auth.token;
    let query = filters.query(page);
    let (categories, tags, providers, products) = tokio::join!(
        api.categories(token),
        api.tags(token),
        api.providers(token),
        api.products(token, &query),
    );

    let categories = options_or_empty(categories, "categories")?;
    let tags = options_or_empty(tags, "tags")?;
    let providers = options_or_empty(providers, "providers")?;

    let (rows, total, pagination, error) = match products {
        Ok(result) => {
            let pager = Pager::new(page, result.page_count());
            (
                result
                    .products
                    .iter()
                    .map(|p| ProductRow::new(p, api.base_url()))
                    .collect(),
                result.total,
                PaginationView::new(&pager, |n| filters.href(n)),
                None,
            )
        }
        Err(e) => (
            Vec::new(),
            0,
            PaginationView::default(),
            Some(load_failure(e, "Error al cargar productos")?),
        ),
    };

    Ok(render(&ProductsTemplate {
        layout: Layout::new(&auth, &session, PATH).await,
        rows,
        count_label: count_label(total),
        categories: OptionView::list(
            categories.into_iter().map(|c| (c.id, c.name)),
            filters.category_id.as_slice(),
        ),
        tags: OptionView::list(
            tags.into_iter().map(|t| (t.id, t.name)),
            filters.tag_id.as_slice(),
        ),
        providers: OptionView::list(
            providers.into_iter().map(|p| (p.id, p.name)),
            filters.provider_id.as_slice(),
        ),
        search: filters.search.clone(),
        has_filters: filters.is_active(),
        pagination,
        error,
    }))
}

/// Delete a product.
#[instrument(skip(auth, state, session))]
pub async fn delete(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let message = match state.api().delete_product(&auth.token, id).await {
        Ok(()) => Flash::success("Producto eliminado"),
        Err(e) => Flash::error(save_failure(e, "Error al eliminar producto")?),
    };
    flash::push(&session, message).await;
    Ok(Redirect::to(PATH))
}

// =============================================================================
// Drafts
// =============================================================================

fn draft_path(id: Uuid) -> String {
    format!("{PATH}/borrador/{id}")
}

/// Open a blank form.
#[instrument(skip(auth, state))]
pub async fn new_product(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
) -> Redirect {
    let id = state.drafts().open(ProductDraft::new(auth.admin.id)).await;
    Redirect::to(&draft_path(id))
}

/// Open a form pre-filled from a stored product.
#[instrument(skip(auth, state))]
pub async fn edit(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let product = match state.api().product(&auth.token, id).await {
        Ok(product) => product,
        Err(BackendError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("producto {id}")));
        }
        Err(e) => return Err(e.into()),
    };

    let draft = state
        .drafts()
        .open(ProductDraft::from_product(auth.admin.id, &product))
        .await;
    Ok(Redirect::to(&draft_path(draft)))
}

/// An image in the form's combined list.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub key: String,
    pub url: String,
    pub label: String,
    pub is_new: bool,
    pub is_primary: bool,
    pub can_move_left: bool,
    pub can_move_right: bool,
}

/// Product form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: Layout,
    pub title: &'static str,
    pub action: String,
    pub is_editing: bool,
    pub name: String,
    pub description: String,
    pub price: String,
    pub categories: Vec<OptionView>,
    pub tags: Vec<OptionView>,
    pub providers: Vec<OptionView>,
    pub images: Vec<ImageView>,
    pub image_count: usize,
    pub max_images: usize,
    pub can_add_images: bool,
    pub notice: Option<Flash>,
}

/// Flash the user back to the list when a draft is gone.
async fn draft_expired(session: &Session) -> Redirect {
    flash::push(
        session,
        Flash::error("El formulario expiró. Vuelve a abrir el producto."),
    )
    .await;
    Redirect::to(PATH)
}

/// Render the product form for a draft.
#[instrument(skip(auth, state, session))]
pub async fn form(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(draft_id): Path<Uuid>,
) -> Result<Response> {
    let Some(handle) = state.drafts().get(draft_id, auth.admin.id).await else {
        return Ok(draft_expired(&session).await.into_response());
    };

    let api = state.api();
    let token = &auth.token;
    let (categories, tags, providers) =
        tokio::join!(api.categories(token), api.tags(token), api.providers(token));
    let categories = options_or_empty(categories, "categories")?;
    let tags = options_or_empty(tags, "tags")?;
    let providers = options_or_empty(providers, "providers")?;

    let mut draft = handle.lock().await;
    let notice = draft.notice.take();
    let fields = &draft.fields;

    let images: Vec<ImageView> = draft
        .images
        .slots()
        .into_iter()
        .map(|slot| ImageView {
            key: slot.key.to_string(),
            url: slot.stored_url.map_or_else(
                || format!("{}/imagen/{}", draft_path(draft_id), slot.key),
                |path| format::resolve_image_url(api.base_url(), Some(path)),
            ),
            label: slot.file_name.unwrap_or("Imagen guardada").to_string(),
            is_new: slot.stored_url.is_none(),
            is_primary: slot.is_primary,
            can_move_left: slot.can_move_left,
            can_move_right: slot.can_move_right,
        })
        .collect();

    let template = ProductFormTemplate {
        layout: Layout::new(&auth, &session, PATH).await,
        title: if draft.is_editing() {
            "Editar Producto"
        } else {
            "Nuevo Producto"
        },
        action: draft_path(draft_id),
        is_editing: draft.is_editing(),
        name: fields.name.clone(),
        description: fields.description.clone(),
        price: fields.price.clone(),
        categories: OptionView::list(
            categories.into_iter().map(|c| (c.id, c.name)),
            &fields.category_ids,
        ),
        tags: OptionView::list(tags.into_iter().map(|t| (t.id, t.name)), &fields.tag_ids),
        providers: OptionView::list(
            providers.into_iter().map(|p| (p.id, p.name)),
            &fields.provider_ids,
        ),
        image_count: images.len(),
        max_images: MAX_IMAGES,
        can_add_images: images.len() < MAX_IMAGES,
        images,
        notice,
    };

    Ok(render(&template).into_response())
}

/// Serve a pending upload so the form can preview it.
#[instrument(skip(auth, state))]
pub async fn preview(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    Path((draft_id, key)): Path<(Uuid, String)>,
) -> Result<Response> {
    let not_found = || AppError::NotFound(format!("imagen {key}"));

    let handle = state
        .drafts()
        .get(draft_id, auth.admin.id)
        .await
        .ok_or_else(not_found)?;
    let key = ImageKey::from_str(&key).map_err(|_| not_found())?;

    let draft = handle.lock().await;
    let upload = draft.images.upload(key).ok_or_else(not_found)?;

    Ok((
        [
            (CONTENT_TYPE, upload.content_type.clone()),
            (CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        upload.data.to_vec(),
    )
        .into_response())
}

// =============================================================================
// Form actions
// =============================================================================

/// What a form button asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Upload,
    Primary(ImageKey),
    Remove(ImageKey),
    Move(ImageKey, MoveDirection),
    Save,
}

impl FromStr for FormAction {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bad = || AppError::BadRequest(format!("acción desconocida: {s}"));
        let key = |k: &str| ImageKey::from_str(k).map_err(|_| bad());

        match s.split_once(':') {
            None if s == "upload" => Ok(Self::Upload),
            None if s == "save" => Ok(Self::Save),
            Some(("primary", k)) => Ok(Self::Primary(key(k)?)),
            Some(("remove", k)) => Ok(Self::Remove(key(k)?)),
            Some(("left", k)) => Ok(Self::Move(key(k)?, MoveDirection::Left)),
            Some(("right", k)) => Ok(Self::Move(key(k)?, MoveDirection::Right)),
            _ => Err(bad()),
        }
    }
}

/// The product form as posted.
#[derive(Debug, Default)]
struct PostedForm {
    fields: ProductFields,
    files: Vec<NewUpload>,
    action: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<PostedForm> {
    let bad = |e: axum::extract::multipart::MultipartError| AppError::BadRequest(e.body_text());
    let mut posted = PostedForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(bad)?;
                // An untouched file input still posts an empty part
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                posted.files.push(NewUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {
                let value = field.text().await.map_err(bad)?;
                let fields = &mut posted.fields;
                match name.as_str() {
                    "name" => fields.name = value,
                    "description" => fields.description = value,
                    "price" => fields.price = value,
                    "category_ids" => fields
                        .category_ids
                        .extend(value.trim().parse::<CategoryId>().ok()),
                    "tag_ids" => fields.tag_ids.extend(value.trim().parse::<TagId>().ok()),
                    "provider_ids" => fields
                        .provider_ids
                        .extend(value.trim().parse::<ProviderId>().ok()),
                    "action" => posted.action = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(posted)
}

/// Apply an image action to the draft.
fn apply_action(draft: &mut ProductDraft, action: FormAction) -> std::result::Result<(), ImageError> {
    match action {
        FormAction::Upload | FormAction::Save => Ok(()),
        FormAction::Primary(key) => draft.images.set_primary(key),
        FormAction::Remove(key) => draft.images.remove(key),
        FormAction::Move(key, direction) => draft.images.move_upload(key, direction),
    }
}

/// Why a save stopped.
enum SaveFailure {
    /// The form itself is invalid; nothing was sent.
    Invalid(String),
    /// A backend call failed; earlier calls stay recorded in the draft.
    Backend(BackendError),
}

impl From<BackendError> for SaveFailure {
    fn from(err: BackendError) -> Self {
        Self::Backend(err)
    }
}

/// Run the requests a save needs, recording each accepted step in the draft.
///
/// Create sends one multipart POST; edit sends the multipart PUT, then the
/// image deletions, then set-primary. A retry after a failure only repeats
/// what the backend has not accepted yet.
async fn save_draft(
    api: &AdminApiClient,
    token: &AuthToken,
    draft: &mut ProductDraft,
) -> std::result::Result<ProductId, SaveFailure> {
    let payload = draft
        .fields
        .validate()
        .map_err(|e| SaveFailure::Invalid(e.to_string()))?;
    sync_committed_uploads(api, token, draft).await?;
    let plan = draft
        .images
        .save_plan(draft.is_editing())
        .map_err(|e| SaveFailure::Invalid(e.to_string()))?;

    let id = match draft.product_id {
        None => {
            let created = api
                .create_product(token, &payload, &plan.uploads, plan.primary_upload_index)
                .await?;
            tracing::info!(product_id = %created.id, "Product created");
            draft.product_id = Some(created.id);
            draft.saved_fields = Some(payload);
            record_uploads(api, token, draft, created.images).await?;
            return Ok(created.id);
        }
        Some(id) => id,
    };

    if !plan.uploads.is_empty() || draft.saved_fields.as_ref() != Some(&payload) {
        let updated = api
            .update_product(token, id, &payload, &plan.uploads, plan.primary_upload_index)
            .await?;
        draft.saved_fields = Some(payload);
        if !plan.uploads.is_empty() {
            record_uploads(api, token, draft, updated.images).await?;
        }
    }

    for image_id in plan.deletions {
        api.delete_product_image(token, id, image_id).await?;
        draft.images.mark_deleted(image_id);
    }

    if let Some(image_id) = plan.set_primary {
        api.set_primary_image(token, id, image_id).await?;
        draft.images.mark_primary_synced(image_id);
    }

    tracing::info!(product_id = %id, "Product updated");
    Ok(id)
}

/// Record uploads the backend just accepted.
///
/// `stored` is the image list from the write response. When it does not
/// account for every upload, the uploads are flagged as committed before the
/// product is fetched, so a failed fetch never leads to sending them twice.
async fn record_uploads(
    api: &AdminApiClient,
    token: &AuthToken,
    draft: &mut ProductDraft,
    stored: Vec<ProductImage>,
) -> std::result::Result<(), BackendError> {
    if draft.images.covers_uploads(&stored) {
        draft.images.mark_uploaded(stored);
        return Ok(());
    }
    draft.uploads_committed = true;
    sync_committed_uploads(api, token, draft).await
}

/// Resolve committed uploads to their stored images.
async fn sync_committed_uploads(
    api: &AdminApiClient,
    token: &AuthToken,
    draft: &mut ProductDraft,
) -> std::result::Result<(), BackendError> {
    let Some(id) = draft.product_id.filter(|_| draft.uploads_committed) else {
        return Ok(());
    };
    let stored = api.product(token, id).await?;
    draft.images.mark_uploaded(stored.images);
    draft.uploads_committed = false;
    Ok(())
}

/// Handle a button press on the product form.
#[instrument(skip(auth, state, session, multipart))]
pub async fn form_action(
    RequireAdminAuth(auth): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(draft_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response> {
    let Some(handle) = state.drafts().get(draft_id, auth.admin.id).await else {
        return Ok(draft_expired(&session).await.into_response());
    };

    let posted = read_form(multipart).await?;
    let action: FormAction = posted.action.as_deref().unwrap_or("save").parse()?;

    let mut draft = handle.lock().await;
    draft.fields = posted.fields;
    draft.notice = None;

    // Keys of committed uploads must map to stored images before any edit
    if let Err(e) = sync_committed_uploads(state.api(), &auth.token, &mut draft).await {
        let message = save_failure(e, "Error al guardar producto")?;
        draft.notice = Some(Flash::error(message));
        return Ok(Redirect::to(&draft_path(draft_id)).into_response());
    }

    // Files picked before any button are kept, whatever the button was
    if !posted.files.is_empty() {
        if let Err(e) = draft.images.add_uploads(posted.files) {
            draft.notice = Some(Flash::error(e.to_string()));
            return Ok(Redirect::to(&draft_path(draft_id)).into_response());
        }
    } else if action == FormAction::Upload {
        draft.notice = Some(Flash::error("Selecciona al menos una imagen"));
    }

    if let Err(e) = apply_action(&mut draft, action) {
        draft.notice = Some(Flash::error(e.to_string()));
    }

    if action != FormAction::Save || draft.notice.is_some() {
        return Ok(Redirect::to(&draft_path(draft_id)).into_response());
    }

    match save_draft(state.api(), &auth.token, &mut draft).await {
        Ok(_) => {
            let message = if draft.is_new {
                "Producto creado"
            } else {
                "Producto actualizado"
            };
            drop(draft);
            state.drafts().discard(draft_id).await;
            flash::push(&session, Flash::success(message)).await;
            Ok(Redirect::to(PATH).into_response())
        }
        Err(SaveFailure::Invalid(message)) => {
            draft.notice = Some(Flash::error(message));
            Ok(Redirect::to(&draft_path(draft_id)).into_response())
        }
        Err(SaveFailure::Backend(e)) => {
            let message = save_failure(e, "Error al guardar producto")?;
            draft.notice = Some(Flash::error(message));
            Ok(Redirect::to(&draft_path(draft_id)).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use catalogo_core::ImageId;

    use super::*;

    #[test]
    fn test_form_actions_parse() {
        assert_eq!("save".parse::<FormAction>().unwrap(), FormAction::Save);
        assert_eq!("upload".parse::<FormAction>().unwrap(), FormAction::Upload);
        assert_eq!(
            "primary:e-12".parse::<FormAction>().unwrap(),
            FormAction::Primary(ImageKey::Existing(ImageId::new(12)))
        );
        assert_eq!(
            "left:n-3".parse::<FormAction>().unwrap(),
            FormAction::Move(ImageKey::New(3), MoveDirection::Left)
        );
        assert!("primary:x-1".parse::<FormAction>().is_err());
        assert!("publish".parse::<FormAction>().is_err());
    }

    #[test]
    fn test_filters_href_keeps_provider() {
        let filters = ProductFilters {
            provider_id: Some(ProviderId::new(5)),
            search: "gris mate".to_string(),
            ..ProductFilters::default()
        };
        assert_eq!(
            filters.href(2),
            "/admin/productos?page=2&provider_id=5&search=gris+mate"
        );
        assert_eq!(ProductFilters::default().href(1), "/admin/productos");
    }

    #[test]
    fn test_filters_ignore_blank_selects() {
        let params = ProductParams {
            category_id: Some(String::new()),
            tag_id: Some("7".to_string()),
            ..ProductParams::default()
        };
        let filters = ProductFilters::from_params(&params);
        assert_eq!(filters.category_id, None);
        assert_eq!(filters.tag_id, Some(TagId::new(7)));
        assert!(filters.is_active());
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(1), "1 producto encontrado");
        assert_eq!(count_label(0), "0 productos encontrados");
    }

    #[test]
    fn test_option_list_marks_selection() {
        let options = OptionView::list(
            vec![(TagId::new(1), "Mate".to_string()), (TagId::new(2), "Brillante".to_string())],
            &[TagId::new(2)],
        );
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].id, "2");
    }
}

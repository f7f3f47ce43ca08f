//! Server-side state of open product forms.
//!
//! The product form needs more than one round trip: files are picked,
//! reordered and promoted to primary before anything is sent to the backend.
//! Each open form gets a [`ProductDraft`] in a moka cache keyed by a random
//! id carried in the form's URL. Drafts expire after the configured idle time.

use std::sync::Arc;
use std::time::Duration;

use catalogo_core::validation::{ProductFields, ProductPayload};
use catalogo_core::{AdminId, ImageSet, Product, ProductId};
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::Flash;

/// Most drafts kept at once.
const MAX_DRAFTS: u64 = 500;

/// One open product form.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Admin who opened the form.
    pub owner: AdminId,
    /// `None` until the product exists in the backend.
    pub product_id: Option<ProductId>,
    pub fields: ProductFields,
    pub images: ImageSet,
    /// Message for the next render of the form.
    pub notice: Option<Flash>,
    /// Whether the form started without a stored product.
    pub is_new: bool,
    /// Fields the backend last accepted for this product.
    pub saved_fields: Option<ProductPayload>,
    /// The backend holds the pending uploads but their image ids are not
    /// known yet. They must not be sent again.
    pub uploads_committed: bool,
}

impl ProductDraft {
    /// Empty form for a new product.
    #[must_use]
    pub fn new(owner: AdminId) -> Self {
        Self {
            owner,
            product_id: None,
            fields: ProductFields::default(),
            images: ImageSet::new(),
            notice: None,
            is_new: true,
            saved_fields: None,
            uploads_committed: false,
        }
    }

    /// Form pre-filled from a stored product.
    #[must_use]
    pub fn from_product(owner: AdminId, product: &Product) -> Self {
        Self {
            owner,
            product_id: Some(product.id),
            fields: ProductFields {
                name: product.name.clone(),
                description: product.description.clone(),
                price: product
                    .price
                    .map(|price| price.amount().to_string())
                    .unwrap_or_default(),
                category_ids: product.categories.iter().map(|c| c.id).collect(),
                tag_ids: product.tags.iter().map(|t| t.id).collect(),
                provider_ids: product.providers.iter().map(|p| p.id).collect(),
            },
            images: ImageSet::from_existing(product.images.clone()),
            notice: None,
            is_new: false,
            saved_fields: None,
            uploads_committed: false,
        }
    }

    /// Whether the form edits an existing product.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.product_id.is_some()
    }
}

/// Shared handle to a draft. Requests on the same draft are serialized.
pub type DraftHandle = Arc<Mutex<ProductDraft>>;

/// Cache of open product forms.
#[derive(Clone)]
pub struct DraftStore {
    cache: Cache<Uuid, DraftHandle>,
}

impl DraftStore {
    /// Create a store whose drafts expire after `ttl` without use.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_DRAFTS)
                .time_to_idle(ttl)
                .build(),
        }
    }

    /// Store a draft and return its id.
    pub async fn open(&self, draft: ProductDraft) -> Uuid {
        let id = Uuid::new_v4();
        self.cache.insert(id, Arc::new(Mutex::new(draft))).await;
        id
    }

    /// Look up a draft belonging to `owner`.
    pub async fn get(&self, id: Uuid, owner: AdminId) -> Option<DraftHandle> {
        let handle = self.cache.get(&id).await?;
        let belongs = handle.lock().await.owner == owner;
        belongs.then_some(handle)
    }

    /// Forget a draft once its form is done.
    pub async fn discard(&self, id: Uuid) {
        self.cache.invalidate(&id).await;
    }
}

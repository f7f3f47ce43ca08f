//! Products, taxonomy, providers and site content.

use catalogo_core::images::PendingUpload;
use catalogo_core::validation::{NameForm, ProductPayload, ProviderPayload};
use catalogo_core::{
    Category, CategoryId, ImageId, Product, ProductId, ProductPage, Provider, ProviderId,
    SiteContent, Tag, TagId,
};
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::instrument;

use super::client::send;
use super::{AdminApiClient, AuthToken, BackendError};

/// Filters for the admin product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminProductQuery {
    pub page: u32,
    pub category_id: Option<CategoryId>,
    pub tag_id: Option<TagId>,
    pub provider_id: Option<ProviderId>,
    pub search: Option<String>,
}

impl AdminProductQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.max(1).to_string())];
        if let Some(id) = self.category_id {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.tag_id {
            pairs.push(("tag_id", id.to_string()));
        }
        if let Some(id) = self.provider_id {
            pairs.push(("provider_id", id.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs
    }
}

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

/// Build the multipart body for a product create or update.
///
/// Id lists travel as JSON arrays; files go under `images` in display order,
/// and `primary_image_index` points into them when the primary is new.
fn product_form(
    payload: &ProductPayload,
    uploads: &[PendingUpload],
    primary_upload_index: Option<usize>,
) -> Result<Form, BackendError> {
    let mut form = Form::new()
        .text("name", payload.name.clone())
        .text("description", payload.description.clone())
        .text("price", payload.price.amount().to_string())
        .text("category_ids", json_list(&payload.category_ids)?)
        .text("tag_ids", json_list(&payload.tag_ids)?)
        .text("provider_ids", json_list(&payload.provider_ids)?);

    for upload in uploads {
        let part = Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        form = form.part("images", part);
    }

    if let Some(index) = primary_upload_index {
        form = form.text("primary_image_index", index.to_string());
    }

    Ok(form)
}

fn json_list<T: Serialize>(ids: &[T]) -> Result<String, BackendError> {
    serde_json::to_string(ids).map_err(|e| BackendError::Parse(e.to_string()))
}

impl AdminApiClient {
    // =========================================================================
    // Products
    // =========================================================================

    /// One page of products, prices included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn products(
        &self,
        token: &AuthToken,
        query: &AdminProductQuery,
    ) -> Result<ProductPage, BackendError> {
        let mut url = self.url("/api/admin/products")?;
        url.query_pairs_mut().extend_pairs(query.pairs());
        self.get(token, url).await
    }

    /// A product with price and providers.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for an unknown id.
    #[instrument(skip(self, token))]
    pub async fn product(&self, token: &AuthToken, id: ProductId) -> Result<Product, BackendError> {
        self.get(token, self.url(&format!("/api/admin/products/{id}"))?)
            .await
    }

    /// Create a product with its first images.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the data.
    #[instrument(skip(self, token, payload, uploads), fields(name = %payload.name, uploads = uploads.len()))]
    pub async fn create_product(
        &self,
        token: &AuthToken,
        payload: &ProductPayload,
        uploads: &[PendingUpload],
        primary_upload_index: Option<usize>,
    ) -> Result<Product, BackendError> {
        let form = product_form(payload, uploads, primary_upload_index)?;
        send(
            self.request(Method::POST, self.url("/api/admin/products")?, Some(token))
                .multipart(form),
        )
        .await
    }

    /// Update a product's fields and append new images.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the data.
    #[instrument(skip(self, token, payload, uploads), fields(uploads = uploads.len()))]
    pub async fn update_product(
        &self,
        token: &AuthToken,
        id: ProductId,
        payload: &ProductPayload,
        uploads: &[PendingUpload],
        primary_upload_index: Option<usize>,
    ) -> Result<Product, BackendError> {
        let form = product_form(payload, uploads, primary_upload_index)?;
        send(
            self.request(
                Method::PUT,
                self.url(&format!("/api/admin/products/{id}"))?,
                Some(token),
            )
            .multipart(form),
        )
        .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_product(&self, token: &AuthToken, id: ProductId) -> Result<(), BackendError> {
        self.send_empty(Method::DELETE, token, &format!("/api/admin/products/{id}"))
            .await
    }

    /// Delete one stored image of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_product_image(
        &self,
        token: &AuthToken,
        id: ProductId,
        image_id: ImageId,
    ) -> Result<(), BackendError> {
        self.send_empty(
            Method::DELETE,
            token,
            &format!("/api/admin/products/{id}/images/{image_id}"),
        )
        .await
    }

    /// Mark a stored image as the product's primary.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn set_primary_image(
        &self,
        token: &AuthToken,
        id: ProductId,
        image_id: ImageId,
    ) -> Result<(), BackendError> {
        self.send_empty(
            Method::PUT,
            token,
            &format!("/api/admin/products/{id}/images/{image_id}/set-primary"),
        )
        .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn categories(&self, token: &AuthToken) -> Result<Vec<Category>, BackendError> {
        self.get(token, self.url("/api/admin/categories")?).await
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn create_category(
        &self,
        token: &AuthToken,
        form: &NameForm,
    ) -> Result<Category, BackendError> {
        self.send_json(Method::POST, Some(token), "/api/admin/categories", form)
            .await
    }

    /// Rename a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_category(
        &self,
        token: &AuthToken,
        id: CategoryId,
        form: &NameForm,
    ) -> Result<Category, BackendError> {
        self.send_json(
            Method::PUT,
            Some(token),
            &format!("/api/admin/categories/{id}"),
            form,
        )
        .await
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_category(&self, token: &AuthToken, id: CategoryId) -> Result<(), BackendError> {
        self.send_empty(Method::DELETE, token, &format!("/api/admin/categories/{id}"))
            .await
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// All tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn tags(&self, token: &AuthToken) -> Result<Vec<Tag>, BackendError> {
        self.get(token, self.url("/api/admin/tags")?).await
    }

    /// Create a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn create_tag(&self, token: &AuthToken, form: &NameForm) -> Result<Tag, BackendError> {
        self.send_json(Method::POST, Some(token), "/api/admin/tags", form)
            .await
    }

    /// Rename a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_tag(
        &self,
        token: &AuthToken,
        id: TagId,
        form: &NameForm,
    ) -> Result<Tag, BackendError> {
        self.send_json(Method::PUT, Some(token), &format!("/api/admin/tags/{id}"), form)
            .await
    }

    /// Delete a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_tag(&self, token: &AuthToken, id: TagId) -> Result<(), BackendError> {
        self.send_empty(Method::DELETE, token, &format!("/api/admin/tags/{id}"))
            .await
    }

    // =========================================================================
    // Providers
    // =========================================================================

    /// All providers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn providers(&self, token: &AuthToken) -> Result<Vec<Provider>, BackendError> {
        self.get(token, self.url("/api/admin/providers")?).await
    }

    /// Create a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload), fields(name = %payload.name))]
    pub async fn create_provider(
        &self,
        token: &AuthToken,
        payload: &ProviderPayload,
    ) -> Result<Provider, BackendError> {
        self.send_json(Method::POST, Some(token), "/api/admin/providers", payload)
            .await
    }

    /// Update a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, payload))]
    pub async fn update_provider(
        &self,
        token: &AuthToken,
        id: ProviderId,
        payload: &ProviderPayload,
    ) -> Result<Provider, BackendError> {
        self.send_json(
            Method::PUT,
            Some(token),
            &format!("/api/admin/providers/{id}"),
            payload,
        )
        .await
    }

    /// Delete a provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_provider(&self, token: &AuthToken, id: ProviderId) -> Result<(), BackendError> {
        self.send_empty(Method::DELETE, token, &format!("/api/admin/providers/{id}"))
            .await
    }

    /// Check the backend answers, without credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let _: Vec<Category> =
            send(self.request(Method::GET, self.url("/api/categories")?, None)).await?;
        Ok(())
    }

    // =========================================================================
    // Site content
    // =========================================================================

    /// Read an editable content block. The read endpoint is public.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if the key has never been saved.
    #[instrument(skip(self))]
    pub async fn site_content(&self, key: &str) -> Result<SiteContent, BackendError> {
        let url = self.url(&format!("/api/site-content/{}", urlencoding::encode(key)))?;
        send(self.request(Method::GET, url, None)).await
    }

    /// Save an editable content block.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, content), fields(len = content.len()))]
    pub async fn update_site_content(
        &self,
        token: &AuthToken,
        key: &str,
        content: &str,
    ) -> Result<SiteContent, BackendError> {
        let path = format!("/api/admin/site-content/{}", urlencoding::encode(key));
        self.send_json(Method::PUT, Some(token), &path, &ContentBody { content })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_query_pairs_include_provider() {
        let query = AdminProductQuery {
            page: 3,
            provider_id: Some(ProviderId::new(4)),
            search: Some("  ".to_string()),
            ..AdminProductQuery::default()
        };
        assert_eq!(
            query.pairs(),
            vec![("page", "3".to_string()), ("provider_id", "4".to_string())]
        );
    }
}

//! Cache types for catalog backend responses.

use catalogo_core::{Category, Product, ProductId, SiteContent, Tag};

/// Cache key for slow-changing reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Categories,
    Tags,
    SiteContent(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Categories(Vec<Category>),
    Tags(Vec<Tag>),
    SiteContent(SiteContent),
}

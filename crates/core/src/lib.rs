//! Catálogo Core - Shared types library.
//!
//! This crate provides common types used across all catalog components:
//! - `storefront` - Public catalog site
//! - `admin` - Administration panel
//! - `cli` - Command-line administration tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and audit actions
//! - [`catalog`] - Entities as served by the catalog backend
//! - [`images`] - Image bookkeeping for the product form
//! - [`validation`] - Admin form validation
//! - [`pagination`] - Page-number strip
//! - [`format`] - Date, text and link formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod format;
pub mod images;
pub mod pagination;
pub mod types;
pub mod validation;

pub use catalog::*;
pub use images::{ImageError, ImageKey, ImageSavePlan, ImageSet, MoveDirection, NewUpload};
pub use pagination::{PageItem, Pager};
pub use types::*;
pub use validation::FormError;

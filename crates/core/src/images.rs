//! Image bookkeeping for the product form.
//!
//! A product being edited has two collections of images: the ones already
//! stored by the backend (`existing`) and files picked in this session that
//! have not been sent yet (`uploads`). Exactly one image across both is the
//! primary. [`ImageSet`] owns that state, applies the form's actions to it,
//! and turns it into an [`ImageSavePlan`] that says which requests the save
//! has to make.
//!
//! The set remembers the server state it was loaded from so deletions are a
//! diff, and exposes `mark_*` hooks so a save that fails halfway can record
//! what the backend already accepted and be retried without repeating it.

use core::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::catalog::ProductImage;
use crate::types::ImageId;

/// Maximum number of images a product can have.
pub const MAX_IMAGES: usize = 10;

/// Maximum size of a single uploaded image (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Content types accepted for product images.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpg", "image/jpeg", "image/webp"];

/// Errors raised by image actions and save planning.
///
/// Messages are user facing.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("{file_name}: el archivo debe ser una imagen (PNG, JPG, JPEG o WEBP)")]
    UnsupportedType { file_name: String },
    #[error("{file_name}: la imagen no debe superar los 5MB")]
    TooLarge { file_name: String },
    #[error("Máximo {max} imágenes permitidas")]
    TooMany { max: usize },
    #[error("La imagen ya no existe")]
    NotFound,
    #[error("No se puede eliminar la única imagen del producto")]
    LastImage,
    #[error("Debes agregar al menos una imagen")]
    NoImages,
    #[error("El producto debe tener al menos una imagen")]
    ProductNeedsImage,
}

/// Identifies an image in the combined list.
///
/// String form is `e-<image id>` for stored images and `n-<sequence>` for
/// pending uploads, which is what the form posts back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Existing(ImageId),
    New(u32),
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing(id) => write!(f, "e-{id}"),
            Self::New(seq) => write!(f, "n-{seq}"),
        }
    }
}

impl FromStr for ImageKey {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            Some(("e", id)) => id.parse().map(Self::Existing).map_err(|_| ImageError::NotFound),
            Some(("n", seq)) => seq.parse().map(Self::New).map_err(|_| ImageError::NotFound),
            _ => Err(ImageError::NotFound),
        }
    }
}

/// Direction for reordering a pending upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

/// A file received from the form, before validation.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A validated file waiting to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub seq: u32,
    pub file_name: String,
    pub content_type: String,
    pub data: Arc<[u8]>,
}

impl PendingUpload {
    /// Key of this upload in the combined list.
    #[must_use]
    pub const fn key(&self) -> ImageKey {
        ImageKey::New(self.seq)
    }
}

/// A position in the combined list, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot<'a> {
    pub key: ImageKey,
    /// Backend path for stored images; `None` for pending uploads.
    pub stored_url: Option<&'a str>,
    pub file_name: Option<&'a str>,
    pub is_primary: bool,
    pub can_move_left: bool,
    pub can_move_right: bool,
}

/// Requests a save has to make, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSavePlan {
    /// Files for the multipart body, in display order.
    pub uploads: Vec<PendingUpload>,
    /// Index into `uploads` of the primary, when the primary is a new file.
    pub primary_upload_index: Option<usize>,
    /// Stored images to delete after the product is saved.
    pub deletions: Vec<ImageId>,
    /// Stored image to mark primary after uploads and deletions.
    pub set_primary: Option<ImageId>,
}

impl ImageSavePlan {
    /// Whether the save needs nothing beyond the product fields.
    #[must_use]
    pub fn is_fields_only(&self) -> bool {
        self.uploads.is_empty() && self.deletions.is_empty() && self.set_primary.is_none()
    }
}

/// The image state of one product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet {
    existing: Vec<ProductImage>,
    uploads: Vec<PendingUpload>,
    primary: Option<ImageKey>,
    original_ids: Vec<ImageId>,
    original_primary: Option<ImageId>,
    next_seq: u32,
}

impl ImageSet {
    /// An empty set for a new product.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the images of a stored product.
    ///
    /// Images are ordered by `display_order`. If the backend reports no
    /// primary, or several, the first flagged (else first) image becomes
    /// primary locally and the next save sends a set-primary to repair it.
    #[must_use]
    pub fn from_existing(mut images: Vec<ProductImage>) -> Self {
        images.sort_by_key(|image| image.display_order);

        let flagged: Vec<ImageId> = images
            .iter()
            .filter(|image| image.is_primary)
            .map(|image| image.id)
            .collect();
        let original_primary = match flagged.as_slice() {
            [only] => Some(*only),
            _ => None,
        };
        let primary = flagged
            .first()
            .copied()
            .or_else(|| images.first().map(|image| image.id))
            .map(ImageKey::Existing);

        Self {
            original_ids: images.iter().map(|image| image.id).collect(),
            existing: images,
            uploads: Vec::new(),
            primary,
            original_primary,
            next_seq: 0,
        }
    }

    /// Total number of images in the combined list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.existing.len() + self.uploads.len()
    }

    /// Whether the combined list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored images still kept, in display order.
    #[must_use]
    pub fn existing(&self) -> &[ProductImage] {
        &self.existing
    }

    /// Pending uploads, in display order.
    #[must_use]
    pub fn uploads(&self) -> &[PendingUpload] {
        &self.uploads
    }

    /// Look up a pending upload by key.
    #[must_use]
    pub fn upload(&self, key: ImageKey) -> Option<&PendingUpload> {
        self.uploads.iter().find(|upload| upload.key() == key)
    }

    /// Key of the current primary image.
    #[must_use]
    pub const fn primary(&self) -> Option<ImageKey> {
        self.primary
    }

    /// Whether `key` is the primary image.
    #[must_use]
    pub fn is_primary(&self, key: ImageKey) -> bool {
        self.primary == Some(key)
    }

    /// Combined list for rendering: stored images first, then uploads.
    #[must_use]
    pub fn slots(&self) -> Vec<ImageSlot<'_>> {
        let stored = self.existing.iter().map(|image| ImageSlot {
            key: ImageKey::Existing(image.id),
            stored_url: Some(image.image_url.as_str()),
            file_name: None,
            is_primary: self.is_primary(ImageKey::Existing(image.id)),
            can_move_left: false,
            can_move_right: false,
        });

        let last = self.uploads.len().saturating_sub(1);
        let pending = self.uploads.iter().enumerate().map(move |(i, upload)| ImageSlot {
            key: upload.key(),
            stored_url: None,
            file_name: Some(upload.file_name.as_str()),
            is_primary: self.is_primary(upload.key()),
            can_move_left: i > 0,
            can_move_right: i < last,
        });

        stored.chain(pending).collect()
    }

    /// Validate and append files.
    ///
    /// The batch is all-or-nothing: one bad file rejects all of them. When the
    /// set was empty, the first added file becomes primary.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsupported type, a file over 5 MiB, or when
    /// the batch would take the product past [`MAX_IMAGES`].
    pub fn add_uploads(&mut self, files: Vec<NewUpload>) -> Result<Vec<ImageKey>, ImageError> {
        for file in &files {
            validate_upload(file)?;
        }
        if self.len() + files.len() > MAX_IMAGES {
            return Err(ImageError::TooMany { max: MAX_IMAGES });
        }

        let mut keys = Vec::with_capacity(files.len());
        for file in files {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.uploads.push(PendingUpload {
                seq,
                file_name: file.file_name,
                content_type: file.content_type.to_ascii_lowercase(),
                data: Arc::from(file.data),
            });
            keys.push(ImageKey::New(seq));
        }

        if self.primary.is_none() {
            self.primary = self.first_key();
        }
        Ok(keys)
    }

    /// Make `key` the primary image. Every other image loses the flag.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NotFound`] if `key` is not in the set.
    pub fn set_primary(&mut self, key: ImageKey) -> Result<(), ImageError> {
        if !self.contains(key) {
            return Err(ImageError::NotFound);
        }
        self.primary = Some(key);
        Ok(())
    }

    /// Remove an image. If it was primary, the first remaining image takes over.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NotFound`] for an unknown key, and
    /// [`ImageError::LastImage`] when removing the only stored image of a
    /// product that has no other images.
    pub fn remove(&mut self, key: ImageKey) -> Result<(), ImageError> {
        match key {
            ImageKey::Existing(id) => {
                let pos = self
                    .existing
                    .iter()
                    .position(|image| image.id == id)
                    .ok_or(ImageError::NotFound)?;
                if self.len() == 1 {
                    return Err(ImageError::LastImage);
                }
                self.existing.remove(pos);
            }
            ImageKey::New(_) => {
                let pos = self
                    .uploads
                    .iter()
                    .position(|upload| upload.key() == key)
                    .ok_or(ImageError::NotFound)?;
                self.uploads.remove(pos);
            }
        }

        if self.primary == Some(key) {
            self.primary = self.first_key();
        }
        Ok(())
    }

    /// Move a pending upload one position. Moving past either end is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::NotFound`] if `key` is not a pending upload.
    pub fn move_upload(&mut self, key: ImageKey, direction: MoveDirection) -> Result<(), ImageError> {
        let pos = self
            .uploads
            .iter()
            .position(|upload| upload.key() == key)
            .ok_or(ImageError::NotFound)?;

        let target = match direction {
            MoveDirection::Left => pos.checked_sub(1),
            MoveDirection::Right => Some(pos + 1).filter(|&t| t < self.uploads.len()),
        };
        if let Some(target) = target {
            self.uploads.swap(pos, target);
        }
        Ok(())
    }

    /// Stored images the user removed since the set was loaded.
    #[must_use]
    pub fn deleted_ids(&self) -> Vec<ImageId> {
        self.original_ids
            .iter()
            .filter(|id| !self.existing.iter().any(|image| image.id == **id))
            .copied()
            .collect()
    }

    /// Work out the requests a save needs.
    ///
    /// A stored primary is sent explicitly when it changed, and also whenever
    /// uploads go out, so the backend cannot promote a new file over it.
    ///
    /// # Errors
    ///
    /// Creating needs at least one upload; editing needs at least one image
    /// in total.
    pub fn save_plan(&self, is_editing: bool) -> Result<ImageSavePlan, ImageError> {
        if is_editing {
            if self.is_empty() {
                return Err(ImageError::ProductNeedsImage);
            }
        } else if self.uploads.is_empty() {
            return Err(ImageError::NoImages);
        }

        let primary_upload_index = match self.primary {
            Some(key @ ImageKey::New(_)) => self.uploads.iter().position(|u| u.key() == key),
            _ => None,
        };
        let set_primary = match self.primary {
            Some(ImageKey::Existing(id))
                if self.original_primary != Some(id) || !self.uploads.is_empty() =>
            {
                Some(id)
            }
            _ => None,
        };

        Ok(ImageSavePlan {
            uploads: self.uploads.clone(),
            primary_upload_index,
            deletions: self.deleted_ids(),
            set_primary,
        })
    }

    /// Record that the pending uploads were accepted.
    ///
    /// `stored` is the product's image list as the backend now reports it.
    /// Images the user already removed stay removed; the new files are
    /// matched to uploads by order, so the chosen primary survives.
    pub fn mark_uploaded(&mut self, stored: Vec<ProductImage>) {
        let deleted = self.deleted_ids();
        let mut stored = stored;
        stored.sort_by_key(|image| image.display_order);

        let new_ids: Vec<ImageId> = stored
            .iter()
            .filter(|image| !self.original_ids.contains(&image.id))
            .map(|image| image.id)
            .collect();

        if let Some(key @ ImageKey::New(_)) = self.primary {
            let index = self.uploads.iter().position(|upload| upload.key() == key);
            self.primary = index
                .and_then(|i| new_ids.get(i))
                .map(|id| ImageKey::Existing(*id));
        }

        self.original_primary = stored.iter().find(|image| image.is_primary).map(|image| image.id);
        self.original_ids = stored.iter().map(|image| image.id).collect();
        self.existing = stored
            .into_iter()
            .filter(|image| !deleted.contains(&image.id))
            .collect();
        self.uploads.clear();

        if self.primary.is_none_or(|key| !self.contains(key)) {
            self.primary = self.first_key();
        }
    }

    /// Whether `stored` lists an image for every pending upload.
    ///
    /// Write responses that leave the image list out cannot be matched to
    /// the uploads; the product has to be fetched first.
    #[must_use]
    pub fn covers_uploads(&self, stored: &[ProductImage]) -> bool {
        let new_images = stored
            .iter()
            .filter(|image| !self.original_ids.contains(&image.id))
            .count();
        new_images >= self.uploads.len()
    }

    /// Record that a stored image was deleted by the backend.
    pub fn mark_deleted(&mut self, id: ImageId) {
        self.original_ids.retain(|original| *original != id);
        if self.original_primary == Some(id) {
            self.original_primary = None;
        }
    }

    /// Record that the backend now has `id` as primary.
    pub fn mark_primary_synced(&mut self, id: ImageId) {
        self.original_primary = Some(id);
    }

    fn contains(&self, key: ImageKey) -> bool {
        match key {
            ImageKey::Existing(id) => self.existing.iter().any(|image| image.id == id),
            ImageKey::New(_) => self.uploads.iter().any(|upload| upload.key() == key),
        }
    }

    fn first_key(&self) -> Option<ImageKey> {
        self.existing
            .first()
            .map(|image| ImageKey::Existing(image.id))
            .or_else(|| self.uploads.first().map(PendingUpload::key))
    }
}

/// Check type and size of one file.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedType`] or [`ImageError::TooLarge`].
pub fn validate_upload(file: &NewUpload) -> Result<(), ImageError> {
    let content_type = file.content_type.to_ascii_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(ImageError::UnsupportedType {
            file_name: file.file_name.clone(),
        });
    }
    if file.data.len() > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge {
            file_name: file.file_name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn stored(id: i64, order: i32, primary: bool) -> ProductImage {
        ProductImage {
            id: ImageId::new(id),
            image_url: format!("/uploads/{id}.png"),
            is_primary: primary,
            display_order: order,
        }
    }

    fn png(name: &str) -> NewUpload {
        NewUpload {
            file_name: name.to_owned(),
            content_type: "image/png".to_owned(),
            data: vec![0_u8; 16],
        }
    }

    fn primaries(set: &ImageSet) -> Vec<ImageKey> {
        set.slots()
            .iter()
            .filter(|slot| slot.is_primary)
            .map(|slot| slot.key)
            .collect()
    }

    #[test]
    fn test_first_upload_of_empty_set_is_primary() {
        let mut set = ImageSet::new();
        let keys = set.add_uploads(vec![png("a.png"), png("b.png")]).unwrap();
        assert_eq!(set.primary(), Some(keys[0]));
    }

    #[test]
    fn test_upload_does_not_steal_primary() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true)]);
        set.add_uploads(vec![png("a.png")]).unwrap();
        assert_eq!(set.primary(), Some(ImageKey::Existing(ImageId::new(1))));
    }

    #[test]
    fn test_set_primary_clears_every_other_flag() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true), stored(2, 1, false)]);
        let keys = set.add_uploads(vec![png("a.png"), png("b.png")]).unwrap();

        set.set_primary(keys[1]).unwrap();
        assert_eq!(primaries(&set), vec![keys[1]]);

        set.set_primary(ImageKey::Existing(ImageId::new(2))).unwrap();
        assert_eq!(primaries(&set), vec![ImageKey::Existing(ImageId::new(2))]);
    }

    #[test]
    fn test_set_primary_unknown_key() {
        let mut set = ImageSet::new();
        assert_eq!(set.set_primary(ImageKey::New(4)), Err(ImageError::NotFound));
    }

    #[test]
    fn test_removing_primary_promotes_first_remaining() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true), stored(2, 1, false)]);
        let keys = set.add_uploads(vec![png("a.png")]).unwrap();

        set.remove(ImageKey::Existing(ImageId::new(1))).unwrap();
        assert_eq!(set.primary(), Some(ImageKey::Existing(ImageId::new(2))));

        set.set_primary(keys[0]).unwrap();
        set.remove(keys[0]).unwrap();
        assert_eq!(set.primary(), Some(ImageKey::Existing(ImageId::new(2))));
    }

    #[test]
    fn test_removing_primary_upload_promotes_next_upload() {
        let mut set = ImageSet::new();
        let keys = set.add_uploads(vec![png("a.png"), png("b.png")]).unwrap();
        set.remove(keys[0]).unwrap();
        assert_eq!(set.primary(), Some(keys[1]));
        set.remove(keys[1]).unwrap();
        assert_eq!(set.primary(), None);
    }

    #[test]
    fn test_cannot_remove_only_stored_image() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true)]);
        assert_eq!(
            set.remove(ImageKey::Existing(ImageId::new(1))),
            Err(ImageError::LastImage)
        );
    }

    #[test]
    fn test_batch_rejected_past_limit() {
        let mut set = ImageSet::new();
        let files: Vec<NewUpload> = (0..9).map(|i| png(&format!("{i}.png"))).collect();
        set.add_uploads(files).unwrap();
        let err = set.add_uploads(vec![png("x.png"), png("y.png")]).unwrap_err();
        assert_eq!(err, ImageError::TooMany { max: MAX_IMAGES });
        assert_eq!(set.len(), 9);
    }

    #[test]
    fn test_batch_rejected_on_bad_file() {
        let mut set = ImageSet::new();
        let gif = NewUpload {
            file_name: "a.gif".to_owned(),
            content_type: "image/gif".to_owned(),
            data: vec![1],
        };
        let err = set.add_uploads(vec![png("ok.png"), gif]).unwrap_err();
        assert!(matches!(err, ImageError::UnsupportedType { .. }));
        assert!(set.is_empty());

        let huge = NewUpload {
            file_name: "big.jpg".to_owned(),
            content_type: "IMAGE/JPEG".to_owned(),
            data: vec![0; MAX_IMAGE_BYTES + 1],
        };
        assert!(matches!(
            set.add_uploads(vec![huge]),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_move_upload_stops_at_edges() {
        let mut set = ImageSet::new();
        let keys = set
            .add_uploads(vec![png("a.png"), png("b.png"), png("c.png")])
            .unwrap();

        set.move_upload(keys[0], MoveDirection::Left).unwrap();
        set.move_upload(keys[2], MoveDirection::Left).unwrap();
        set.move_upload(keys[2], MoveDirection::Left).unwrap();
        set.move_upload(keys[1], MoveDirection::Right).unwrap();

        let order: Vec<&str> = set.uploads().iter().map(|u| u.file_name.as_str()).collect();
        assert_eq!(order, vec!["c.png", "a.png", "b.png"]);

        let slots = set.slots();
        assert!(!slots[0].can_move_left);
        assert!(!slots[2].can_move_right);
    }

    #[test]
    fn test_move_rejects_stored_image() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true)]);
        assert_eq!(
            set.move_upload(ImageKey::Existing(ImageId::new(1)), MoveDirection::Right),
            Err(ImageError::NotFound)
        );
    }

    #[test]
    fn test_create_plan_requires_upload() {
        assert_eq!(ImageSet::new().save_plan(false), Err(ImageError::NoImages));
    }

    #[test]
    fn test_edit_plan_requires_any_image() {
        let mut set = ImageSet::new();
        let keys = set.add_uploads(vec![png("a.png")]).unwrap();
        set.remove(keys[0]).unwrap();
        assert_eq!(set.save_plan(true), Err(ImageError::ProductNeedsImage));
    }

    #[test]
    fn test_create_plan_points_at_primary_upload() {
        let mut set = ImageSet::new();
        let keys = set
            .add_uploads(vec![png("a.png"), png("b.png"), png("c.png")])
            .unwrap();
        set.set_primary(keys[2]).unwrap();
        set.move_upload(keys[2], MoveDirection::Left).unwrap();

        let plan = set.save_plan(false).unwrap();
        assert_eq!(plan.uploads.len(), 3);
        assert_eq!(plan.primary_upload_index, Some(1));
        assert_eq!(plan.set_primary, None);
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn test_edit_plan_diffs_deletions_and_primary() {
        let mut set = ImageSet::from_existing(vec![
            stored(1, 0, true),
            stored(2, 1, false),
            stored(3, 2, false),
        ]);
        set.remove(ImageKey::Existing(ImageId::new(1))).unwrap();
        set.set_primary(ImageKey::Existing(ImageId::new(3))).unwrap();

        let plan = set.save_plan(true).unwrap();
        assert_eq!(plan.deletions, vec![ImageId::new(1)]);
        assert_eq!(plan.set_primary, Some(ImageId::new(3)));
        assert!(plan.uploads.is_empty());
    }

    #[test]
    fn test_unchanged_edit_is_fields_only() {
        let set = ImageSet::from_existing(vec![stored(1, 0, true), stored(2, 1, false)]);
        assert!(set.save_plan(true).unwrap().is_fields_only());
    }

    #[test]
    fn test_stored_primary_is_pinned_when_uploading() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true)]);
        set.add_uploads(vec![png("a.png")]).unwrap();
        let plan = set.save_plan(true).unwrap();
        assert_eq!(plan.primary_upload_index, None);
        assert_eq!(plan.set_primary, Some(ImageId::new(1)));
    }

    #[test]
    fn test_inconsistent_server_primary_is_repaired() {
        let set = ImageSet::from_existing(vec![stored(1, 0, false), stored(2, 1, false)]);
        assert_eq!(set.primary(), Some(ImageKey::Existing(ImageId::new(1))));
        assert_eq!(set.save_plan(true).unwrap().set_primary, Some(ImageId::new(1)));

        let doubled = ImageSet::from_existing(vec![stored(1, 0, true), stored(2, 1, true)]);
        assert_eq!(primaries(&doubled), vec![ImageKey::Existing(ImageId::new(1))]);
        assert_eq!(
            doubled.save_plan(true).unwrap().set_primary,
            Some(ImageId::new(1))
        );
    }

    #[test]
    fn test_retry_after_partial_save_skips_committed_work() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true), stored(2, 1, false)]);
        let keys = set.add_uploads(vec![png("a.png"), png("b.png")]).unwrap();
        set.set_primary(keys[1]).unwrap();
        set.remove(ImageKey::Existing(ImageId::new(2))).unwrap();

        // The update went through: backend now has both uploads, with the
        // second one flagged primary, and image 2 is still there.
        set.mark_uploaded(vec![
            stored(1, 0, false),
            stored(2, 1, false),
            stored(7, 2, false),
            stored(8, 3, true),
        ]);
        assert!(set.uploads().is_empty());
        assert_eq!(set.primary(), Some(ImageKey::Existing(ImageId::new(8))));

        let plan = set.save_plan(true).unwrap();
        assert!(plan.uploads.is_empty());
        assert_eq!(plan.deletions, vec![ImageId::new(2)]);
        assert_eq!(plan.set_primary, None);

        set.mark_deleted(ImageId::new(2));
        assert!(set.save_plan(true).unwrap().is_fields_only());
    }

    #[test]
    fn test_covers_uploads_needs_one_new_image_per_file() {
        let mut set = ImageSet::from_existing(vec![stored(1, 0, true)]);
        set.add_uploads(vec![png("a.png"), png("b.png")]).unwrap();

        assert!(!set.covers_uploads(&[]));
        assert!(!set.covers_uploads(&[stored(1, 0, true), stored(7, 1, false)]));
        assert!(set.covers_uploads(&[
            stored(1, 0, true),
            stored(7, 1, false),
            stored(8, 2, false)
        ]));
    }

    #[test]
    fn test_image_key_string_form() {
        let key: ImageKey = "e-12".parse().unwrap();
        assert_eq!(key, ImageKey::Existing(ImageId::new(12)));
        assert_eq!(ImageKey::New(3).to_string(), "n-3");
        assert!("x-1".parse::<ImageKey>().is_err());
        assert!("n-abc".parse::<ImageKey>().is_err());
    }
}

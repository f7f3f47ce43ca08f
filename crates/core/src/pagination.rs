//! Page-number strip shared by the catalog and admin listings.

/// Most page buttons shown at once, ellipses excluded.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// One entry of the page strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page numbers to display for `current` out of `total`.
///
/// All pages when they fit; otherwise the first and last page are always
/// shown, with a window near the current page and ellipses for the gaps.
#[must_use]
pub fn page_items(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(Page).collect();
    }

    if current <= 3 {
        (1..=4).map(Page).chain([Ellipsis, Page(total)]).collect()
    } else if current >= total - 2 {
        [Page(1), Ellipsis]
            .into_iter()
            .chain((total - 3..=total).map(Page))
            .collect()
    } else {
        [Page(1), Ellipsis]
            .into_iter()
            .chain((current - 1..=current + 1).map(Page))
            .chain([Ellipsis, Page(total)])
            .collect()
    }
}

/// Pagination state for a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub total: u32,
    pub items: Vec<PageItem>,
}

impl Pager {
    /// Build the pager, clamping `current` into `1..=total`.
    #[must_use]
    pub fn new(current: u32, total: u32) -> Self {
        let total = total.max(1);
        let current = current.clamp(1, total);
        Self {
            current,
            total,
            items: page_items(current, total),
        }
    }

    /// Nothing is rendered for a single page.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.total > 1
    }

    /// Previous page, if any.
    #[must_use]
    pub const fn prev(&self) -> Option<u32> {
        if self.current > 1 {
            Some(self.current - 1)
        } else {
            None
        }
    }

    /// Next page, if any.
    #[must_use]
    pub const fn next(&self) -> Option<u32> {
        if self.current < self.total {
            Some(self.current + 1)
        } else {
            None
        }
    }
}

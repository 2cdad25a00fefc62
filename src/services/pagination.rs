use crate::models::{ImageSummary, StagedImage};
use serde::Serialize;

/// Number of page links shown by the grid pager
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One window of a slice
#[derive(Debug, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
}

/// `ceil(len / page_size)`; zero when `page_size` is zero
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Returns `items[(page-1)*size .. page*size]` and the page count. Page
/// numbers are 1-based and not clamped: anything outside `[1, total_pages]`
/// yields an empty window.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> Page<'_, T> {
    let total_pages = total_pages(items.len(), page_size);
    let window = match page_number.checked_sub(1) {
        Some(index) if page_size > 0 => {
            let start = index.saturating_mul(page_size).min(items.len());
            let end = start.saturating_add(page_size).min(items.len());
            &items[start..end]
        }
        _ => &items[..0],
    };

    Page {
        items: window,
        total_pages,
    }
}

/// Brings a requested page into `[1, total_pages]` (page 1 when there are no pages)
pub fn clamp_page(page_number: usize, total_pages: usize) -> usize {
    page_number.clamp(1, total_pages.max(1))
}

/// Page links to show around `current`: all of them when they fit, otherwise
/// a window of `max_visible` pinned to either end or centred on `current`.
pub fn visible_pages(current: usize, total_pages: usize, max_visible: usize) -> Vec<usize> {
    if total_pages <= max_visible {
        return (1..=total_pages).collect();
    }
    if max_visible == 0 {
        return Vec::new();
    }

    let half = max_visible / 2;
    let start = if current <= half + 1 {
        1
    } else if current >= total_pages - half {
        total_pages - max_visible + 1
    } else {
        current - half
    };

    (start..start + max_visible).collect()
}

/// Serializable page of staged images for the host view
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub items: Vec<ImageSummary>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based position of the first item, for index badges; 0 when the page is empty
    pub first_index: usize,
    pub visible_pages: Vec<usize>,
}

impl PageView {
    pub fn build(images: &[StagedImage], page_size: usize, page_number: usize) -> Self {
        let page = paginate(images, page_size, page_number);
        Self {
            items: page.items.iter().map(StagedImage::summary).collect(),
            page: page_number,
            total_pages: page.total_pages,
            total_items: images.len(),
            first_index: if page.items.is_empty() {
                0
            } else {
                page_number
                    .saturating_sub(1)
                    .saturating_mul(page_size)
                    .saturating_add(1)
            },
            visible_pages: visible_pages(page_number, page.total_pages, MAX_VISIBLE_PAGES),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 6), 5);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_paginate_windows() {
        let items: Vec<u32> = (1..=25).collect();

        let page = paginate(&items, 10, 1);
        assert_eq!(page.items, &items[0..10]);
        assert_eq!(page.total_pages, 3);

        let page = paginate(&items, 10, 3);
        assert_eq!(page.items, &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_paginate_out_of_range() {
        let items: Vec<u32> = (1..=25).collect();
        assert!(paginate(&items, 10, 0).items.is_empty());
        assert!(paginate(&items, 10, 4).items.is_empty());
        assert!(paginate(&items, 10, usize::MAX).items.is_empty());
        assert!(paginate(&items, 0, 1).items.is_empty());
        assert_eq!(paginate(&items, 10, 99).total_pages, 3);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 10, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_visible_pages() {
        assert_eq!(visible_pages(1, 3, 5), vec![1, 2, 3]);
        assert_eq!(visible_pages(2, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(visible_pages(3, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(visible_pages(6, 10, 5), vec![4, 5, 6, 7, 8]);
        assert_eq!(visible_pages(8, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(visible_pages(10, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(visible_pages(5, 10, 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_page_view_first_index() {
        let view = PageView::build(&[], 10, 1);
        assert_eq!(view.total_items, 0);
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.first_index, 0);
        assert!(view.items.is_empty());
        assert!(view.visible_pages.is_empty());
    }
}

//! Page-size derivation, page windows and the page navigation strip.

use serde::Serialize;

/// Page sizes offered before trimming to the record count.
pub const BASE_PAGE_SIZES: [usize; 5] = [10, 25, 50, 100, 500];

/// Derives the page sizes worth offering for `total` records.
///
/// Every base size strictly below the total is kept and the total itself is
/// appended as the "show all" option. With no records only the smallest base
/// size is offered.
pub fn page_size_options(total: usize) -> Vec<usize> {
    if total == 0 {
        return vec![BASE_PAGE_SIZES[0]];
    }

    let mut options: Vec<usize> = BASE_PAGE_SIZES
        .iter()
        .copied()
        .filter(|&size| size < total)
        .collect();
    options.push(total);
    options.sort_unstable();
    options.dedup();
    options
}

/// Number of pages needed to show `total` items, `0` for an empty set.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Picks the offered page size closest to `requested`.
///
/// An offered size is kept as is; otherwise the largest offered size below it
/// wins, then the smallest offered size. Without a request the smallest
/// offered size is used.
pub fn nearest_page_size(requested: Option<usize>, options: &[usize]) -> usize {
    let smallest = options.first().copied().unwrap_or(BASE_PAGE_SIZES[0]);
    let Some(requested) = requested else {
        return smallest;
    };
    if options.contains(&requested) {
        return requested;
    }
    options
        .iter()
        .copied()
        .filter(|&size| size <= requested)
        .max()
        .unwrap_or(smallest)
}

/// Currently visible slice of the filtered set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub page_size: usize,
    /// 1-indexed.
    pub current_page: usize,
}

impl PageWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    /// Last valid page number for `total` items; never below 1.
    pub fn last_page(&self, total: usize) -> usize {
        total_pages(total, self.page_size).max(1)
    }

    /// Moves to `page`, clamped into `[1, last_page]`.
    pub fn go_to(&mut self, page: usize, total: usize) {
        self.current_page = page.clamp(1, self.last_page(total));
    }

    /// Index range of the visible page within a set of `total` items.
    pub fn bounds(&self, total: usize) -> std::ops::Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }
}

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One page of items together with the navigation strip.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Page numbers to link, `None` marks a gap.
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total_items: usize) -> Self {
        let current_page = if window.current_page == 0 {
            1
        } else {
            window.current_page
        };
        let total_pages = total_pages(total_items, window.page_size);

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
            total_pages,
            total_items,
            page_size: window.page_size,
            page_size_options: page_size_options(total_items),
        }
    }

    /// Converts the items while keeping the navigation data.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            page_size: self.page_size,
            page_size_options: self.page_size_options,
        }
    }
}

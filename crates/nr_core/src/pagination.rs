use serde::{Deserialize, Serialize};

use crate::types::Article;
use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidArgument(format!("page must be >= 1, got {}", page)));
        }
        if page_size < 1 {
            return Err(Error::InvalidArgument(format!(
                "page size must be >= 1, got {}",
                page_size
            )));
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The items ranked `[(page-1)*size, page*size)`. Past the end this is empty.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = match (self.page - 1).checked_mul(self.page_size) {
            Some(start) if start < items.len() => start,
            _ => return &[],
        };
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub articles: Vec<Article>,
    pub total_results: usize,
}

/// The visible page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultWindow {
    pub articles: Vec<Article>,
    pub total_results: usize,
    pub loading: bool,
}

impl ResultWindow {
    /// Initial window: nothing fetched yet, first search pending.
    pub fn pending() -> Self {
        Self {
            articles: Vec::new(),
            total_results: 0,
            loading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationState {
    pub fn new(current_page: usize, page_size: usize) -> Self {
        Self {
            current_page,
            page_size,
        }
    }

    pub fn total_pages(&self, total_results: usize) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        total_results.div_ceil(self.page_size)
    }

    /// 1-based inclusive bounds for "Showing X - Y of Z". `None` when there is nothing to show.
    pub fn visible_range(&self, total_results: usize) -> Option<(usize, usize)> {
        if total_results == 0 {
            return None;
        }
        let first = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .saturating_add(1)
            .min(total_results);
        let last = self
            .current_page
            .saturating_mul(self.page_size)
            .min(total_results);
        Some((first, last))
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self, total_results: usize) -> bool {
        self.current_page < self.total_pages(total_results)
    }

    /// Page buttons: every page up to seven pages, otherwise the first and last page,
    /// the neighbours of the current page, and ellipses over the gaps.
    pub fn page_links(&self, total_results: usize) -> Vec<PageLink> {
        let total_pages = self.total_pages(total_results);
        if total_pages <= 7 {
            return (1..=total_pages).map(PageLink::Page).collect();
        }

        let current = self.current_page;
        let mut links = vec![PageLink::Page(1)];
        if current > 3 {
            links.push(PageLink::Ellipsis);
        }
        let start = current.saturating_sub(1).max(2);
        let end = current.saturating_add(1).min(total_pages - 1);
        links.extend((start..=end).map(PageLink::Page));
        if current < total_pages - 2 {
            links.push(PageLink::Ellipsis);
        }
        links.push(PageLink::Page(total_pages));
        links
    }
}

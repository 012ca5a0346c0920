use serde::de::DeserializeOwned;
use shared::protocol::PageEnvelope;

use crate::error::{ListError, ListResult};

/// One page of rows plus the pagination metadata the backend reported.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub is_first: bool,
    pub is_last: bool,
}

/// `ceil(total_items / page_size)`; zero when `page_size` is zero.
pub fn expected_total_pages(total_items: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(page_size))
}

impl<T> ListPage<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            page_size,
            total_items: 0,
            total_pages: 0,
            is_first: true,
            is_last: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `page` lies in `[0, total_pages)`.
    pub fn contains_page(&self, page: u32) -> bool {
        page < self.total_pages
    }

    /// 1-based inclusive row range shown on this page, `None` when empty.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.total_items == 0 {
            return None;
        }
        let size = u64::from(self.page_size);
        let start = u64::from(self.current_page) * size + 1;
        let end = ((u64::from(self.current_page) + 1) * size).min(self.total_items);
        (start <= end).then_some((start, end))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            is_first: self.is_first,
            is_last: self.is_last,
        }
    }
}

impl<T> TryFrom<PageEnvelope<T>> for ListPage<T> {
    type Error = ListError;

    fn try_from(envelope: PageEnvelope<T>) -> ListResult<Self> {
        if envelope.size == 0 {
            return Err(ListError::Parse("page size must be positive".into()));
        }
        if envelope.total_elements == 0 && !envelope.content.is_empty() {
            return Err(ListError::Parse(format!(
                "{} rows returned for an empty result set",
                envelope.content.len()
            )));
        }
        Ok(Self {
            items: envelope.content,
            current_page: envelope.current_page,
            page_size: envelope.size,
            total_items: envelope.total_elements,
            total_pages: envelope.total_pages,
            is_first: envelope.first,
            is_last: envelope.last,
        })
    }
}

/// Decodes a `<base>/paginated` response body.
pub fn parse_page<T: DeserializeOwned>(body: &[u8]) -> ListResult<ListPage<T>> {
    let envelope: PageEnvelope<T> = serde_json::from_slice(body)?;
    ListPage::try_from(envelope)
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;

//! The list query value object and its URL query-string encoding.

use std::collections::{BTreeMap, HashSet};

use url::form_urlencoded;

pub const PAGE_PARAM: &str = "page";
pub const SIZE_PARAM: &str = "size";

/// Page position, page size and active filters for one list view.
///
/// Values are immutable; every `with_*` call returns a new query. Filters
/// never hold empty values: setting a filter to an empty string removes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    page: u32,
    page_size: u32,
    filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// A page size of zero is bumped to one.
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
            filters: BTreeMap::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn with_page_size(&self, page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..self.clone()
        }
    }

    pub fn with_filter(&self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        let mut next = self.clone();
        let name = name.into();
        let value = value.as_ref().trim();
        if value.is_empty() {
            next.filters.remove(&name);
        } else {
            next.filters.insert(name, value.to_string());
        }
        next
    }

    pub fn with_filters(&self, filters: BTreeMap<String, String>) -> Self {
        filters
            .into_iter()
            .fold(Self { filters: BTreeMap::new(), ..self.clone() }, |query, (name, value)| {
                query.with_filter(name, value)
            })
    }

    /// Parameters sent to the paginated endpoint: `page`, `size` and every
    /// non-empty filter, defaults included.
    pub fn request_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            (PAGE_PARAM.to_string(), self.page.to_string()),
            (SIZE_PARAM.to_string(), self.page_size.to_string()),
        ];
        params.extend(
            self.filters
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        params
    }

    /// Canonical browser query string (no leading `?`). Fields equal to
    /// `defaults` are left out, so the default query encodes to `""`.
    pub fn to_url_query(&self, defaults: &ListQuery) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.page != defaults.page {
            serializer.append_pair(PAGE_PARAM, &self.page.to_string());
        }
        if self.page_size != defaults.page_size {
            serializer.append_pair(SIZE_PARAM, &self.page_size.to_string());
        }
        for (name, value) in &self.filters {
            if defaults.filter(name) != Some(value.as_str()) {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }

    /// Resolves a browser query string against `defaults`.
    ///
    /// Only `page`, `size` and the names in `filter_keys` are recognized. A
    /// value that is missing or malformed keeps the default; when a key is
    /// repeated the first occurrence wins.
    pub fn from_url_query(query: &str, defaults: &ListQuery, filter_keys: &[&str]) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut resolved = defaults.clone();
        let mut seen = HashSet::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if !seen.insert(key.to_string()) {
                continue;
            }
            match key.as_ref() {
                PAGE_PARAM => {
                    if let Ok(page) = value.trim().parse::<u32>() {
                        resolved.page = page;
                    }
                }
                SIZE_PARAM => {
                    if let Ok(size) = value.trim().parse::<u32>() {
                        if size > 0 {
                            resolved.page_size = size;
                        }
                    }
                }
                name if filter_keys.contains(&name) => {
                    let value = value.trim();
                    if !value.is_empty() {
                        resolved.filters.insert(name.to_string(), value.to_string());
                    }
                }
                _ => {}
            }
        }

        resolved
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;

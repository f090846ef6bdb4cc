//! Length-aware pagination over in-memory collections.

use serde::Serialize;

use crate::config::PaginatorConfig;
use crate::context::RequestFacts;
use crate::error::ConfigurationError;

/// Query parameters never re-appended to pagination links.
pub const EXCLUDED_PARAMS: [&str; 5] =
    ["_token", "page", "client_user", "client_token", "client_token_type"];

/// One page of results plus the link metadata to reach the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total item count across all pages.
    pub total: usize,
    /// Items per page.
    pub per_page: usize,
    /// 1-based current page number.
    pub current_page: usize,
    /// Last page number, at least 1.
    pub last_page: usize,
    /// Base URL for page links, when pinned.
    pub path: Option<String>,
    /// Query parameters appended to page links.
    pub query: Vec<(String, String)>,
}

impl<T> Page<T> {
    /// Appends the given query parameters to page links, minus the
    /// [`EXCLUDED_PARAMS`] bookkeeping keys.
    pub fn append_cleaned_request(&mut self, params: &[(String, String)]) {
        self.query = params
            .iter()
            .filter(|(key, _)| !EXCLUDED_PARAMS.contains(&key.as_str()))
            .cloned()
            .collect();
    }

    /// Pins the page path to the caller's current URL.
    pub fn set_full_url(&mut self, facts: &RequestFacts) {
        self.path.clone_from(&facts.current_url);
    }
}

/// Builds pages from collections using the configured default page size.
#[derive(Debug, Clone)]
pub struct Paginator {
    default_page_items: usize,
}

impl Paginator {
    /// Creates a paginator with the configured default page size.
    #[must_use]
    pub fn new(config: &PaginatorConfig) -> Self {
        Self { default_page_items: config.page_items }
    }

    /// Slices `items` into the requested page.
    ///
    /// A missing or zero `page` means page 1; a missing `per_page` falls
    /// back to the configured default.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::NonPositivePageItems`] when the
    /// resolved page size is zero.
    pub fn build<T>(
        &self,
        items: Vec<T>,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> Result<Page<T>, ConfigurationError> {
        let per_page = self.resolve_page_items(per_page)?;
        let current_page = page.filter(|p| *p > 0).unwrap_or(1);
        let total = items.len();
        let last_page = total.div_ceil(per_page).max(1);

        let items: Vec<T> = items
            .into_iter()
            .skip((current_page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(Page {
            items,
            total,
            per_page,
            current_page,
            last_page,
            path: None,
            query: Vec::new(),
        })
    }

    fn resolve_page_items(&self, requested: Option<usize>) -> Result<usize, ConfigurationError> {
        let resolved = requested.unwrap_or(self.default_page_items);
        if resolved == 0 {
            return Err(ConfigurationError::NonPositivePageItems);
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paginator() -> Paginator {
        Paginator::new(&PaginatorConfig::default())
    }

    fn build_page(
        items: Vec<u32>,
        page: Option<usize>,
        per_page: Option<usize>,
    ) -> Page<u32> {
        match paginator().build(items, page, per_page) {
            Ok(p) => p,
            Err(e) => panic!("unexpected pagination error: {e}"),
        }
    }

    #[test]
    fn slices_the_requested_page() {
        let page = build_page((1..=10).collect(), Some(2), Some(3));
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.per_page, 3);
        assert_eq!(page.total, 10);
        assert_eq!(page.last_page, 4);
    }

    #[test]
    fn missing_page_defaults_to_first() {
        let page = build_page((1..=5).collect(), None, Some(2));
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.current_page, 1);

        let zero = build_page((1..=5).collect(), Some(0), Some(2));
        assert_eq!(zero.current_page, 1, "page 0 must be treated as page 1");
    }

    #[test]
    fn missing_per_page_uses_configured_default() {
        let page = build_page((1..=40).collect(), None, None);
        assert_eq!(page.per_page, 15);
        assert_eq!(page.items.len(), 15);
        assert_eq!(page.last_page, 3);
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        let page = build_page(Vec::new(), None, None);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn page_beyond_the_end_is_empty() {
        let page = build_page((1..=4).collect(), Some(9), Some(2));
        assert!(page.items.is_empty());
        assert_eq!(page.current_page, 9);
        assert_eq!(page.last_page, 2);
    }

    #[test]
    fn zero_per_page_is_a_configuration_error() {
        let result = paginator().build::<u32>(vec![1, 2], None, Some(0));
        assert!(matches!(result, Err(ConfigurationError::NonPositivePageItems)));
    }

    #[test]
    fn append_cleaned_request_drops_bookkeeping_params() {
        let mut page = build_page((1..=4).collect(), None, None);
        let params = [
            ("filter".to_owned(), "active".to_owned()),
            ("page".to_owned(), "3".to_owned()),
            ("_token".to_owned(), "csrf".to_owned()),
            ("client_token".to_owned(), "abc".to_owned()),
            ("sort".to_owned(), "name".to_owned()),
        ];
        page.append_cleaned_request(&params);
        assert_eq!(
            page.query,
            vec![
                ("filter".to_owned(), "active".to_owned()),
                ("sort".to_owned(), "name".to_owned()),
            ]
        );
    }

    #[test]
    fn set_full_url_pins_the_current_url() {
        let mut page = build_page(vec![1], None, None);
        let facts = RequestFacts::new("/reports").with_current_url("https://example.com/reports");
        page.set_full_url(&facts);
        assert_eq!(page.path.as_deref(), Some("https://example.com/reports"));
    }
}

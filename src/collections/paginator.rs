//! Lazy pagination over list endpoints.
//!
//! List endpoints answer with
//! `{ "items": [...], "nextPageToken": "...", "pageInfo": { "totalResults": n } }`.
//! A [`Paginator`] fetches those pages one at a time, only when an item past
//! the end of its buffer is requested.

use serde_json::Value;

use crate::clients::{HttpClient, HttpError, HttpRequest};

/// Largest `maxResults` accepted by list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Page cap for scans that search a list for one item.
pub const SEARCH_PAGE_LIMIT: u32 = 10;

/// One page of a list response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// The items, in the order received.
    pub items: Vec<Value>,
    /// Token for the next page; `None` on the last page.
    pub next_page_token: Option<String>,
    /// The total reported in `pageInfo.totalResults`, if any.
    pub total_results: Option<u64>,
}

impl Page {
    /// Extracts a page from a decoded list response.
    ///
    /// A missing `items` key is an empty page and an empty token counts as
    /// no token.
    ///
    /// ```rust
    /// use serde_json::json;
    /// use yt::collections::Page;
    ///
    /// let page = Page::from_body(&json!({
    ///     "items": [{"id": "a"}],
    ///     "nextPageToken": "",
    ///     "pageInfo": {"totalResults": 1}
    /// }));
    /// assert_eq!(page.items.len(), 1);
    /// assert_eq!(page.next_page_token, None);
    /// assert_eq!(page.total_results, Some(1));
    /// ```
    #[must_use]
    pub fn from_body(body: &Value) -> Self {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_page_token = body
            .get("nextPageToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(String::from);
        let total_results = body
            .pointer("/pageInfo/totalResults")
            .and_then(Value::as_u64);

        Self {
            items,
            next_page_token,
            total_results,
        }
    }
}

/// A forward-only, index-addressable sequence over every page of a list.
///
/// Page N+1 is requested only once the items of page N have been consumed
/// and page N carried a continuation token. Once exhausted, no further
/// requests are made.
#[derive(Debug)]
pub struct Paginator {
    client: HttpClient,
    request: HttpRequest,
    items: Vec<Value>,
    cursor: usize,
    next_page_token: Option<String>,
    total_results: Option<u64>,
    pages_fetched: u32,
    max_pages: Option<u32>,
    exhausted: bool,
}

impl Paginator {
    /// Creates a paginator that sends `request` (plus `pageToken`) through `client`.
    #[must_use]
    pub const fn new(client: HttpClient, request: HttpRequest) -> Self {
        Self {
            client,
            request,
            items: Vec::new(),
            cursor: 0,
            next_page_token: None,
            total_results: None,
            pages_fetched: 0,
            max_pages: None,
            exhausted: false,
        }
    }

    /// Stops after `max_pages` pages even if more are available.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Returns the request every page is fetched with.
    #[must_use]
    pub const fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Returns the number of pages fetched so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Returns `true` once no further page will be fetched.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the items fetched so far.
    #[must_use]
    pub fn buffered(&self) -> &[Value] {
        &self.items
    }

    /// Returns the item at `index`, fetching pages until it is buffered.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] of a failed page request.
    pub async fn get(&mut self, index: usize) -> Result<Option<&Value>, HttpError> {
        while index >= self.items.len() && !self.exhausted {
            self.fetch_next_page().await?;
        }
        Ok(self.items.get(index))
    }

    /// Returns the next item after the last one returned by this method.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] of a failed page request.
    pub async fn next_item(&mut self) -> Result<Option<Value>, HttpError> {
        let index = self.cursor;
        let item = self.get(index).await?.cloned();
        if item.is_some() {
            self.cursor += 1;
        }
        Ok(item)
    }

    /// Returns `pageInfo.totalResults` of the first page, fetching it if needed.
    ///
    /// # Errors
    ///
    /// Returns the [`HttpError`] of a failed page request.
    pub async fn total_results(&mut self) -> Result<Option<u64>, HttpError> {
        if self.pages_fetched == 0 && !self.exhausted {
            self.fetch_next_page().await?;
        }
        Ok(self.total_results)
    }

    async fn fetch_next_page(&mut self) -> Result<(), HttpError> {
        let request = match &self.next_page_token {
            Some(token) => self.request.with_query("pageToken", token.as_str()),
            None => self.request.clone(),
        };

        let response = self.client.request(&request).await?;
        let page = Page::from_body(&response.body);

        self.pages_fetched += 1;
        if self.pages_fetched == 1 {
            self.total_results = page.total_results;
        }
        tracing::trace!(
            path = %self.request.path,
            page = self.pages_fetched,
            items = page.items.len(),
            "Fetched page"
        );

        self.items.extend(page.items);
        self.next_page_token = page.next_page_token;

        let capped = self
            .max_pages
            .is_some_and(|max_pages| self.pages_fetched >= max_pages);
        if self.next_page_token.is_none() || capped {
            self.exhausted = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_without_items_is_empty() {
        let page = Page::from_body(&json!({"kind": "youtube#videoListResponse"}));
        assert!(page.items.is_empty());
        assert_eq!(page.next_page_token, None);
        assert_eq!(page.total_results, None);
    }

    #[test]
    fn test_page_keeps_item_order_and_token() {
        let page = Page::from_body(&json!({
            "items": [{"id": "1"}, {"id": "2"}, {"id": "3"}],
            "nextPageToken": "CAMQAA"
        }));

        let ids: Vec<&str> = page.items.iter().filter_map(|i| i["id"].as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(page.next_page_token.as_deref(), Some("CAMQAA"));
    }

    #[test]
    fn test_page_of_null_body() {
        assert_eq!(Page::from_body(&Value::Null), Page::default());
    }
}

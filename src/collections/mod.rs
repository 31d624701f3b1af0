//! Collections of API resources.
//!
//! A [`Collection`] is a query over one list endpoint: it accumulates filter
//! parameters and evaluates sequence operations lazily through a
//! [`Paginator`].
//!
//! # Example
//!
//! ```rust,ignore
//! use yt::resources::Video;
//!
//! let mut videos = client.videos()?.filter_by([("chart", "mostPopular")]);
//! let total = videos.count().await?;
//! let first: Option<Video> = videos.first().await?;
//! let titles = videos.map(|video| video.title().to_string()).await?;
//! ```

mod paginator;

pub use paginator::{Page, Paginator, DEFAULT_PAGE_SIZE, SEARCH_PAGE_LIMIT};

use std::fmt;
use std::marker::PhantomData;
use std::ops::ControlFlow;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clients::{camelize_key, ApiError, HttpClient, HttpRequest, QueryValue};

type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A lazily evaluated query over a list endpoint, yielding items of type `T`.
///
/// Terminal operations take `&mut self`: pages fetched by one operation are
/// kept and reused by the next one on the same collection.
/// [`filter_by`](Self::filter_by) and [`keep_if`](Self::keep_if) return a new
/// collection that starts fetching from the first page.
pub struct Collection<T> {
    client: HttpClient,
    request: HttpRequest,
    paginator: Paginator,
    keep_if: Option<Predicate<T>>,
    page_limit: Option<u32>,
    marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("request", &self.request)
            .field("pages_fetched", &self.paginator.pages_fetched())
            .field("keep_if", &self.keep_if.is_some())
            .field("page_limit", &self.page_limit)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> Collection<T> {
    /// Creates a collection over `request`, sent through `client`.
    #[must_use]
    pub fn new(client: HttpClient, request: HttpRequest) -> Self {
        let paginator = Paginator::new(client.clone(), request.clone());
        Self {
            client,
            request,
            paginator,
            keep_if: None,
            page_limit: None,
            marker: PhantomData,
        }
    }

    /// Returns the request each page is fetched with (without `pageToken`).
    #[must_use]
    pub const fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Returns the number of pages fetched by this collection so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> u32 {
        self.paginator.pages_fetched()
    }

    /// Returns a new collection with `params` merged into the query.
    ///
    /// Names are normalized to lower camel case; a parameter that is already
    /// set is replaced.
    #[must_use]
    pub fn filter_by<I, K, V>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        let mut request = self.request.clone();
        for (key, value) in params {
            request.query.insert(camelize_key(key.as_ref()), value.into());
        }
        self.fresh(request, self.keep_if.clone())
    }

    /// Returns a new collection that skips items for which `predicate` is false.
    ///
    /// The predicate runs on decoded items, after they are fetched.
    #[must_use]
    pub fn keep_if<F>(&self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.fresh(self.request.clone(), Some(Arc::new(predicate)))
    }

    /// Returns a new collection that fetches at most `max_pages` pages.
    #[must_use]
    pub fn with_page_limit(&self, max_pages: u32) -> Self {
        let mut collection = self.fresh(self.request.clone(), self.keep_if.clone());
        collection.page_limit = Some(max_pages);
        collection.paginator =
            Paginator::new(self.client.clone(), self.request.clone()).with_max_pages(Some(max_pages));
        collection
    }

    fn fresh(&self, request: HttpRequest, keep_if: Option<Predicate<T>>) -> Self {
        let paginator = Paginator::new(self.client.clone(), request.clone())
            .with_max_pages(self.page_limit);
        Self {
            client: self.client.clone(),
            request,
            paginator,
            keep_if,
            page_limit: self.page_limit,
            marker: PhantomData,
        }
    }

    /// Returns the number of items.
    ///
    /// Without a [`keep_if`](Self::keep_if) predicate or a page limit, the
    /// total reported by the first page is used when present, so only one
    /// page is fetched. Otherwise only the reachable items are counted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn count(&mut self) -> Result<u64, ApiError> {
        if self.keep_if.is_none() && self.page_limit.is_none() {
            if let Some(total) = self.paginator.total_results().await? {
                return Ok(total);
            }
        }

        let mut count = 0_u64;
        self.walk(|_| {
            count += 1;
            ControlFlow::Continue(())
        })
        .await?;
        Ok(count)
    }

    /// Returns the first item, fetching at most one page when it is not empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn first(&mut self) -> Result<Option<T>, ApiError> {
        self.find(|_| true).await
    }

    /// Returns the first item matching `predicate`, stopping at the first match.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn find<F>(&mut self, mut predicate: F) -> Result<Option<T>, ApiError>
    where
        F: FnMut(&T) -> bool,
    {
        let mut found = None;
        self.walk(|item| {
            if predicate(&item) {
                found = Some(item);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await?;
        Ok(found)
    }

    /// Returns `true` if any item matches `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn any<F>(&mut self, predicate: F) -> Result<bool, ApiError>
    where
        F: FnMut(&T) -> bool,
    {
        Ok(self.find(predicate).await?.is_some())
    }

    /// Applies `f` to every item, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn map<U, F>(&mut self, mut f: F) -> Result<Vec<U>, ApiError>
    where
        F: FnMut(T) -> U,
    {
        let mut mapped = Vec::new();
        self.walk(|item| {
            mapped.push(f(item));
            ControlFlow::Continue(())
        })
        .await?;
        Ok(mapped)
    }

    /// Calls `f` on every item, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn each<F>(&mut self, mut f: F) -> Result<(), ApiError>
    where
        F: FnMut(T),
    {
        self.walk(|item| {
            f(item);
            ControlFlow::Continue(())
        })
        .await
    }

    /// Collects every item.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if a page request fails or an item cannot be decoded.
    pub async fn to_vec(&mut self) -> Result<Vec<T>, ApiError> {
        self.map(|item| item).await
    }

    /// Visits kept items from the start of the buffer until `visit` breaks.
    async fn walk<F>(&mut self, mut visit: F) -> Result<(), ApiError>
    where
        F: FnMut(T) -> ControlFlow<()>,
    {
        let mut index = 0;
        loop {
            let Some(value) = self.paginator.get(index).await? else {
                return Ok(());
            };
            let item: T = serde_json::from_value(value.clone())?;
            index += 1;

            let kept = self.keep_if.as_ref().map_or(true, |keep| keep(&item));
            if kept && visit(item).is_break() {
                return Ok(());
            }
        }
    }
}

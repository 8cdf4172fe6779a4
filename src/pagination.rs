//! Page following for list-style calls.
//!
//! The API paginates in two styles:
//!
//! - offset pagination: the body carries an absolute `next_page` URL or `null`;
//! - cursor pagination: `meta.has_more` says whether `links.next` is worth following.
//!
//! [`Paginator`] hides both behind one sequence of items. Callers can pull it
//! page by page, as a stream of items, or collect everything at once.

use std::collections::HashSet;

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ZendeskError;
use crate::models::PageInfo;
use crate::transport::{ApiRequest, Target, Transport};

/// Lazily walks every page of a list endpoint.
pub struct Paginator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    next: Option<ApiRequest>,
    roots: &'static [&'static str],
    visited: HashSet<String>,
    pages: usize,
}

impl<'a, T: Transport + ?Sized> Paginator<'a, T> {
    /// Creates a paginator whose first page is `first`.
    ///
    /// Items are read from the first key of `roots` present in each page.
    pub fn new(transport: &'a T, first: ApiRequest, roots: &'static [&'static str]) -> Self {
        Self {
            transport,
            next: Some(first),
            roots,
            visited: HashSet::new(),
            pages: 0,
        }
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetches the next page and returns its items, or `None` when exhausted.
    ///
    /// Follow-up pages reuse the verb and body of the first request. Paging
    /// stops at a next link that was already followed or that some fetched
    /// page named as its previous page. The first request is a relative path,
    /// so a loop back to it is only caught through a later page's previous
    /// link.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>, ZendeskError> {
        let Some(request) = self.next.take() else {
            return Ok(None);
        };

        let method = request.method.clone();
        let body = request.body.clone();
        let page = self.transport.send(request).await?;
        self.pages += 1;

        let items = extract_items(&page, self.roots);

        let info = PageInfo::from_page(&page);
        if let Some(prev) = info.previous_url() {
            self.visited.insert(prev);
        }
        self.next = match info.next_url() {
            Some(url) if self.visited.insert(url.clone()) => Some(ApiRequest {
                method,
                target: Target::Url(url),
                body,
            }),
            Some(url) => {
                tracing::warn!(url = %url, "next page link already visited, stopping");
                None
            }
            None => None,
        };

        tracing::debug!(
            page = self.pages,
            items = items.len(),
            has_next = self.next.is_some(),
            "Fetched page"
        );

        Ok(Some(items))
    }

    /// Fetches every remaining page and concatenates the items.
    pub async fn collect(mut self) -> Result<Vec<Value>, ZendeskError> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }

    /// Fetches pages until at least `limit` items are in hand.
    ///
    /// Returns at most `limit` items and whether more are available. Pages
    /// past the one that reaches the limit are never requested.
    pub async fn take_items(mut self, limit: usize) -> Result<(Vec<Value>, bool), ZendeskError> {
        let mut items = Vec::new();
        while items.len() < limit {
            match self.next_page().await? {
                Some(page) => items.extend(page),
                None => break,
            }
        }
        let more = items.len() > limit || self.next.is_some();
        items.truncate(limit);
        Ok((items, more))
    }

    /// Turns the paginator into a stream of items, fetching pages on demand.
    pub fn into_stream(self) -> impl Stream<Item = Result<Value, ZendeskError>> + 'a {
        stream::try_unfold(self, |mut pager| async move {
            let page = pager.next_page().await?;
            Ok::<_, ZendeskError>(page.map(|items| {
                (stream::iter(items.into_iter().map(Ok::<_, ZendeskError>)), pager)
            }))
        })
        .try_flatten()
    }
}

/// Pulls the payload of one page out from under the first matching root.
///
/// An array root yields its elements, an object root yields one item, and a
/// page with none of the roots is returned whole.
pub fn extract_items(page: &Value, roots: &[&str]) -> Vec<Value> {
    for root in roots {
        match page.get(*root) {
            Some(Value::Array(items)) => return items.clone(),
            Some(Value::Null) | None => continue,
            Some(item) => return vec![item.clone()],
        }
    }
    match page {
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// Finds the URL of the following page, if any.
pub fn next_link(page: &Value) -> Option<String> {
    PageInfo::from_page(page).next_url()
}

/// Deserializes collected items into a typed list.
pub fn decode_items<D: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<D>, ZendeskError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ZendeskError::Serialization))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_items_array_root() {
        let page = json!({"views": [{"id": 1}, {"id": 2}], "next_page": null});
        assert_eq!(extract_items(&page, &["views", "view"]).len(), 2);
    }

    #[test]
    fn test_extract_items_singular_root() {
        let page = json!({"view": {"id": 1}});
        let items = extract_items(&page, &["views", "view"]);
        assert_eq!(items, vec![json!({"id": 1})]);
    }

    #[test]
    fn test_extract_items_falls_back_to_body() {
        let page = json!({"rows": [], "columns": []});
        assert_eq!(extract_items(&page, &["views"]), vec![page.clone()]);
        assert!(extract_items(&Value::Null, &["views"]).is_empty());
    }

    #[test]
    fn test_next_link_offset() {
        let page = json!({"next_page": "https://acme.zendesk.com/api/v2/views.json?page=2"});
        assert_eq!(
            next_link(&page).as_deref(),
            Some("https://acme.zendesk.com/api/v2/views.json?page=2")
        );
        assert!(next_link(&json!({"next_page": null})).is_none());
    }

    #[test]
    fn test_next_link_cursor() {
        let more = json!({
            "meta": {"has_more": true, "after_cursor": "abc"},
            "links": {"next": "https://acme.zendesk.com/api/v2/tickets.json?page[after]=abc"}
        });
        assert!(next_link(&more).unwrap().contains("page[after]=abc"));

        let done = json!({
            "meta": {"has_more": false},
            "links": {"next": "https://acme.zendesk.com/api/v2/tickets.json?page[after]=zzz"}
        });
        assert!(next_link(&done).is_none());
    }

    struct CannedPages(std::sync::Mutex<Vec<Value>>);

    impl Transport for CannedPages {
        fn send(
            &self,
            _request: ApiRequest,
        ) -> impl std::future::Future<Output = Result<Value, ZendeskError>> + Send {
            let page = self.0.lock().unwrap().remove(0);
            std::future::ready(Ok(page))
        }
    }

    const PAGE_1: &str = "https://acme.zendesk.com/api/v2/views.json?page=1";
    const PAGE_2: &str = "https://acme.zendesk.com/api/v2/views.json?page=2";

    fn first_request() -> ApiRequest {
        ApiRequest::new(reqwest::Method::GET, crate::path::ApiPath::new().lit("views"))
    }

    #[test]
    fn test_next_page_until_exhausted() {
        let transport = CannedPages(std::sync::Mutex::new(vec![
            json!({"views": [{"id": 1}], "next_page": PAGE_2}),
            json!({"views": [], "next_page": null}),
        ]));
        let mut pager = Paginator::new(&transport, first_request(), &["views"]);

        tokio_test::block_on(async {
            assert_eq!(pager.next_page().await.unwrap().unwrap().len(), 1);
            assert_eq!(pager.next_page().await.unwrap().unwrap().len(), 0);
            assert!(pager.next_page().await.unwrap().is_none());
        });
        assert_eq!(pager.pages_fetched(), 2);
    }

    #[test]
    fn test_next_link_back_to_first_page_stops() {
        let transport = CannedPages(std::sync::Mutex::new(vec![
            json!({"views": [{"id": 1}], "next_page": PAGE_2}),
            json!({"views": [{"id": 2}], "previous_page": PAGE_1, "next_page": PAGE_1}),
            json!({"views": [{"id": 1}], "next_page": PAGE_2}),
        ]));
        let pager = Paginator::new(&transport, first_request(), &["views"]);

        let items = tokio_test::block_on(pager.collect()).unwrap();

        assert_eq!(items, vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(transport.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_take_items_stops_at_limit() {
        let transport = CannedPages(std::sync::Mutex::new(vec![
            json!({"views": [{"id": 1}, {"id": 2}], "next_page": PAGE_2}),
            json!({"views": [{"id": 3}, {"id": 4}], "next_page": PAGE_1}),
            json!({"views": [{"id": 5}], "next_page": null}),
        ]));
        let pager = Paginator::new(&transport, first_request(), &["views"]);

        let (items, more) = tokio_test::block_on(pager.take_items(3)).unwrap();

        assert_eq!(items.len(), 3);
        assert!(more);
        assert_eq!(transport.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_take_items_exact_fit_without_next() {
        let transport = CannedPages(std::sync::Mutex::new(vec![
            json!({"views": [{"id": 1}, {"id": 2}], "next_page": null}),
        ]));
        let pager = Paginator::new(&transport, first_request(), &["views"]);

        let (items, more) = tokio_test::block_on(pager.take_items(2)).unwrap();

        assert_eq!(items.len(), 2);
        assert!(!more);
    }

    #[test]
    fn test_decode_items_reports_bad_shape() {
        let items = vec![json!("not a number")];
        let result: Result<Vec<u64>, _> = decode_items(items);
        assert!(matches!(result, Err(ZendeskError::Serialization(_))));
    }
}

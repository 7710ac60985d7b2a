use futures::stream::{self, Stream};
use serde::de::DeserializeOwned;
use smartthings_domain::{PagedResult, Result};
use tracing::debug;

use crate::endpoint::{EndpointClient, RequestOptions};

/// Lazy, forward-only walk over the items of a paged list.
///
/// Pages after the first are fetched through the client's GET only once the
/// current page is exhausted, so they get the same authentication and
/// refresh handling as any other request.
pub struct PaginatedListIterator<T> {
    client: EndpointClient,
    items: std::vec::IntoIter<T>,
    next_href: Option<String>,
    options: Option<RequestOptions>,
}

impl<T: DeserializeOwned> PaginatedListIterator<T> {
    pub fn new(client: EndpointClient, page: PagedResult<T>) -> Self {
        let next_href = page.next_href().map(str::to_owned);
        Self { client, items: page.items.into_iter(), next_href, options: None }
    }

    /// Options applied when fetching following pages.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// The next item, or `None` once the last page is exhausted.
    ///
    /// A failed page fetch leaves the iterator positioned before that page,
    /// so calling again retries it.
    pub async fn next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.items.next() {
                return Ok(Some(item));
            }

            let Some(href) = self.next_href.as_deref() else {
                return Ok(None);
            };

            debug!(href, "Fetching next page");
            let page: PagedResult<T> = self.client.get(Some(href), None, self.options.as_ref()).await?;
            self.next_href = page.next_href().map(str::to_owned);
            self.items = page.items.into_iter();
        }
    }

    /// Adapt into a `Stream` of items. The stream ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        stream::try_unfold(self, |mut iter| async move {
            Ok(iter.next().await?.map(|item| (item, iter)))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::TryStreamExt;
    use serde_json::json;
    use smartthings_domain::{EndpointError, Link, Links, UrlProvider};

    use super::*;
    use crate::auth::NoOpAuthenticator;
    use crate::endpoint::EndpointClientConfig;
    use crate::testing::ScriptedTransport;
    use crate::transport::HttpResponse;

    fn client(transport: Arc<ScriptedTransport>) -> EndpointClient {
        let config = EndpointClientConfig::new(NoOpAuthenticator).with_url_provider(UrlProvider::new(
            "https://api.example.com",
            "https://auth.example.com",
            "https://key.example.com",
        ));
        EndpointClient::new("devices", config, transport)
    }

    fn page(items: Vec<&str>, next: Option<&str>) -> PagedResult<String> {
        PagedResult {
            items: items.into_iter().map(String::from).collect(),
            links: next.map(|href| Links { next: Some(Link { href: href.to_string() }), previous: None }),
        }
    }

    #[tokio::test]
    async fn test_single_page_yields_every_item_then_none() {
        let transport = Arc::new(ScriptedTransport::from_responses(vec![]));
        let mut iter = PaginatedListIterator::new(client(transport.clone()), page(vec!["a", "b"], None));

        // The first item is yielded, not skipped.
        assert_eq!(iter.next().await.unwrap().as_deref(), Some("a"));
        assert_eq!(iter.next().await.unwrap().as_deref(), Some("b"));
        assert_eq!(iter.next().await.unwrap(), None);
        assert_eq!(iter.next().await.unwrap(), None);
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_follows_next_links_lazily() {
        let transport = Arc::new(ScriptedTransport::from_responses(vec![
            HttpResponse::json(200, &json!({"items": ["c"], "_links": {"next": {"href": "/devices?page=3"}}})),
            HttpResponse::json(200, &json!({"items": ["d"], "_links": {}})),
        ]));
        let mut iter =
            PaginatedListIterator::new(client(transport.clone()), page(vec!["a", "b"], Some("/devices?page=2")));

        assert_eq!(iter.next().await.unwrap().as_deref(), Some("a"));
        assert_eq!(iter.next().await.unwrap().as_deref(), Some("b"));
        assert_eq!(transport.request_count().await, 0);

        assert_eq!(iter.next().await.unwrap().as_deref(), Some("c"));
        assert_eq!(iter.next().await.unwrap().as_deref(), Some("d"));
        assert_eq!(iter.next().await.unwrap(), None);

        let urls: Vec<String> = transport.requests().await.into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["https://api.example.com/devices?page=2", "https://api.example.com/devices?page=3"]);
    }

    #[tokio::test]
    async fn test_skips_empty_pages() {
        let transport = Arc::new(ScriptedTransport::from_responses(vec![
            HttpResponse::json(200, &json!({"items": [], "_links": {"next": {"href": "/devices?page=3"}}})),
            HttpResponse::json(200, &json!({"items": ["z"]})),
        ]));
        let mut iter = PaginatedListIterator::new(client(transport), page(vec![], Some("/devices?page=2")));

        assert_eq!(iter.next().await.unwrap().as_deref(), Some("z"));
        assert_eq!(iter.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_page_can_be_retried() {
        let transport = Arc::new(ScriptedTransport::from_responses(vec![
            HttpResponse::json(503, &json!({"error": "busy"})),
            HttpResponse::json(200, &json!({"items": ["b"]})),
        ]));
        let mut iter = PaginatedListIterator::new(client(transport), page(vec!["a"], Some("/devices?page=2")));

        assert_eq!(iter.next().await.unwrap().as_deref(), Some("a"));
        assert!(matches!(iter.next().await, Err(EndpointError::Api { status: 503, .. })));
        assert_eq!(iter.next().await.unwrap().as_deref(), Some("b"));
        assert_eq!(iter.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_into_stream_collects_all_pages() {
        let transport = Arc::new(ScriptedTransport::from_responses(vec![HttpResponse::json(
            200,
            &json!({"items": ["c"]}),
        )]));
        let iter = PaginatedListIterator::new(client(transport), page(vec!["a", "b"], Some("/devices?page=2")));

        let items: Vec<String> = iter.into_stream().try_collect().await.unwrap();
        assert_eq!(items, vec!["a", "b", "c"]);
    }
}

//! Pagination walker
//!
//! List endpoints answer with pages linked through `_links.next.href`.
//! [`PaginatedListIterator`] walks them lazily, [`EndpointClient::get_paged_items`]
//! collects them eagerly.

pub mod iterator;

use serde::de::DeserializeOwned;
use smartthings_domain::{HttpParams, PagedResult, Result};
use tracing::{debug, instrument};

pub use iterator::PaginatedListIterator;

use crate::endpoint::{EndpointClient, RequestOptions};

impl EndpointClient {
    /// GET every page of a list and concatenate the items in order.
    ///
    /// `params` apply to the first request only; following pages are fetched
    /// from their `next` href with the same `options`. Any failing page fails
    /// the whole call.
    #[instrument(skip(self, params, options), fields(base_path = %self.base_path()))]
    pub async fn get_paged_items<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<Vec<T>> {
        let mut page: PagedResult<T> = self.get(path, params, options).await?;
        let mut items = std::mem::take(&mut page.items);
        let mut pages = 1_usize;

        while let Some(href) = page.next_href().map(str::to_owned) {
            page = self.get(Some(&href), None, options).await?;
            items.append(&mut page.items);
            pages += 1;
        }

        debug!(pages, items = items.len(), "Collected paged list");
        Ok(items)
    }

    /// GET the first page of a list and return a lazy iterator over all of
    /// its items.
    pub async fn paginate<T: DeserializeOwned>(
        &self,
        path: Option<&str>,
        params: Option<&HttpParams>,
        options: Option<&RequestOptions>,
    ) -> Result<PaginatedListIterator<T>> {
        let first: PagedResult<T> = self.get(path, params, options).await?;
        let iter = PaginatedListIterator::new(self.clone(), first);
        Ok(match options {
            Some(options) => iter.with_options(options.clone()),
            None => iter,
        })
    }
}

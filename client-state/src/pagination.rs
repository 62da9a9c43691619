use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use payloads::requests::PaginationParams;

use crate::Listener;
use crate::fetch::{Fetcher, Resource, SettlePolicy};

/// Parameters that can be shallow-merged with a partial update.
pub trait MergeParams: Clone + PartialEq + 'static {
    type Patch;

    /// A copy of `self` with every field present in `patch` overwritten.
    fn merged(&self, patch: &Self::Patch) -> Self;
}

/// Partial update to [`PaginationParams`]. `None` fields are retained;
/// filter keys are added or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsPatch {
    pub page: Option<u32>,
    pub items_per_page: Option<u32>,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ParamsPatch {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Default::default()
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = Some(items_per_page);
        self
    }

    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }
}

impl MergeParams for PaginationParams {
    type Patch = ParamsPatch;

    fn merged(&self, patch: &ParamsPatch) -> Self {
        let mut merged = self.clone();
        if let Some(page) = patch.page {
            merged.page = page;
        }
        if let Some(items_per_page) = patch.items_per_page {
            merged.items_per_page = items_per_page;
        }
        if let Some(search) = &patch.search {
            merged.search = search.clone();
        }
        merged.filters.extend(
            patch
                .filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        merged
    }
}

type Operation<P, T> = Rc<dyn Fn(P) -> LocalBoxFuture<'static, Result<T, String>>>;

/// A [`Fetcher`] whose single argument is a stored, mergeable parameter
/// record.
pub struct PaginatedFetcher<P, T> {
    params: Rc<RefCell<P>>,
    fetcher: Fetcher<T>,
    operation: Operation<P, T>,
}

impl<P, T> Clone for PaginatedFetcher<P, T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            fetcher: self.fetcher.clone(),
            operation: self.operation.clone(),
        }
    }
}

impl<P: MergeParams, T: Clone + 'static> PaginatedFetcher<P, T> {
    pub fn new<F, Fut>(initial: P, policy: SettlePolicy, operation: F) -> Self
    where
        F: Fn(P) -> Fut + 'static,
        Fut: Future<Output = Result<T, String>> + 'static,
    {
        Self {
            params: Rc::new(RefCell::new(initial)),
            fetcher: Fetcher::new(policy),
            operation: Rc::new(move |params| operation(params).boxed_local()),
        }
    }

    pub fn set_listener(&self, listener: Listener) {
        self.fetcher.set_listener(listener);
    }

    pub fn params(&self) -> P {
        self.params.borrow().clone()
    }

    pub fn resource(&self) -> Resource<T> {
        self.fetcher.snapshot()
    }

    /// Number of calls issued so far.
    pub fn issued(&self) -> u64 {
        self.fetcher.issued()
    }

    /// Fetch using the stored parameters.
    pub fn fetch(&self) -> LocalBoxFuture<'static, Result<T, String>> {
        let params = self.params();
        self.fetcher.run((self.operation)(params))
    }

    /// Merge `patch` into the stored parameters.
    ///
    /// When the merge changes anything, the new parameters are stored and
    /// exactly one fetch with them is returned. An update that changes
    /// nothing returns `None` and issues no call.
    pub fn update_params(
        &self,
        patch: &P::Patch,
    ) -> Option<LocalBoxFuture<'static, Result<T, String>>> {
        let merged = self.params.borrow().merged(patch);
        if *self.params.borrow() == merged {
            return None;
        }
        *self.params.borrow_mut() = merged.clone();
        self.fetcher.notify();
        Some(self.fetcher.run((self.operation)(merged)))
    }

    /// One call with `overrides` merged over the stored parameters. The
    /// overrides are not persisted.
    pub fn refetch(
        &self,
        overrides: &P::Patch,
    ) -> LocalBoxFuture<'static, Result<T, String>> {
        let params = self.params.borrow().merged(overrides);
        self.fetcher.run((self.operation)(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recording_fetcher() -> (
        PaginatedFetcher<PaginationParams, usize>,
        Rc<RefCell<Vec<PaginationParams>>>,
    ) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorded = calls.clone();
        let fetcher = PaginatedFetcher::new(
            PaginationParams::new(1, 50),
            SettlePolicy::ArrivalOrder,
            move |params: PaginationParams| {
                recorded.borrow_mut().push(params.clone());
                async move { Ok(params.search.len()) }
            },
        );
        (fetcher, calls)
    }

    #[test]
    fn merge_overwrites_only_given_fields() {
        let base = PaginationParams::new(3, 20)
            .with_search("old")
            .with_filter("order", "asc");
        let merged = base.merged(
            &ParamsPatch::search("new").with_filter("sort", "title"),
        );
        assert_eq!(merged.page, 3);
        assert_eq!(merged.items_per_page, 20);
        assert_eq!(merged.search, "new");
        assert_eq!(merged.filters.get("order").map(String::as_str), Some("asc"));
        assert_eq!(merged.filters.get("sort").map(String::as_str), Some("title"));
    }

    #[tokio::test]
    async fn update_params_merges_and_fetches_once() {
        let (fetcher, calls) = recording_fetcher();
        fetcher.fetch().await.unwrap();

        let call = fetcher
            .update_params(&ParamsPatch::search("x"))
            .expect("params changed");
        call.await.unwrap();

        let expected = PaginationParams::new(1, 50).with_search("x");
        assert_eq!(fetcher.params(), expected);
        assert_eq!(*calls.borrow(), vec![PaginationParams::new(1, 50), expected]);
    }

    #[tokio::test]
    async fn identical_update_issues_no_call() {
        let (fetcher, calls) = recording_fetcher();
        assert!(fetcher.update_params(&ParamsPatch::page(1)).is_none());
        assert!(calls.borrow().is_empty());
        assert_eq!(fetcher.issued(), 0);
    }

    #[tokio::test]
    async fn refetch_overrides_are_not_persisted() {
        let (fetcher, calls) = recording_fetcher();
        let result = fetcher.refetch(&ParamsPatch::page(4)).await;
        assert_eq!(result, Ok(0));
        assert_eq!(calls.borrow()[0].page, 4);
        assert_eq!(fetcher.params().page, 1);
    }

    #[tokio::test]
    async fn refetch_without_overrides_repeats_the_stored_call() {
        let (fetcher, calls) = recording_fetcher();
        fetcher.fetch().await.unwrap();
        fetcher.refetch(&ParamsPatch::default()).await.unwrap();
        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }
}

use std::future::Future;
use std::rc::Rc;

use client_state::{FetchState, MergeParams, PaginatedFetcher, SettlePolicy};
use futures::future::LocalBoxFuture;
use yew::prelude::*;

pub struct PaginatedFetchReturn<P: MergeParams, T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// The stored parameters
    pub params: P,
    /// Merge a partial update into the stored parameters and fetch with the
    /// result. Updates that change nothing are ignored.
    pub update_params: Callback<P::Patch>,
    /// Fetch once with overrides that are not stored
    pub refetch: Callback<P::Patch>,
    fetcher: PaginatedFetcher<P, T>,
}

impl<P: MergeParams, T: Clone> Clone for PaginatedFetchReturn<P, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            params: self.params.clone(),
            update_params: self.update_params.clone(),
            refetch: self.refetch.clone(),
            fetcher: self.fetcher.clone(),
        }
    }
}

impl<P: MergeParams, T: Clone + 'static> PaginatedFetchReturn<P, T> {
    /// Like `refetch`, with the outcome handed back to the caller.
    pub fn refetch_async(
        &self,
        overrides: &P::Patch,
    ) -> LocalBoxFuture<'static, Result<T, String>> {
        self.fetcher.refetch(overrides)
    }
}

/// Fetch hook whose single argument is a stored parameter record. Fetches
/// once on mount with `initial`; later fetches come only from
/// `update_params` and `refetch`.
#[hook]
pub fn use_paginated_fetch<P, T, F, Fut>(
    initial: P,
    policy: SettlePolicy,
    operation: F,
) -> PaginatedFetchReturn<P, T>
where
    P: MergeParams,
    P::Patch: 'static,
    T: Clone + 'static,
    F: Fn(P) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let update = use_force_update();
    let fetcher = use_memo((), move |_| {
        let fetcher = PaginatedFetcher::new(initial, policy, operation);
        fetcher.set_listener(Rc::new(move || update.force_update()));
        fetcher
    });

    {
        let fetcher = fetcher.clone();
        use_effect_with((), move |_| super::drive(fetcher.fetch()));
    }

    let update_params = {
        let fetcher = fetcher.clone();
        Callback::from(move |patch: P::Patch| {
            if let Some(call) = fetcher.update_params(&patch) {
                super::drive(call);
            }
        })
    };

    let refetch = {
        let fetcher = fetcher.clone();
        Callback::from(move |overrides: P::Patch| {
            super::drive(fetcher.refetch(&overrides));
        })
    };

    let resource = fetcher.resource();
    PaginatedFetchReturn {
        data: resource.data,
        is_loading: resource.is_loading,
        error: resource.error,
        params: fetcher.params(),
        update_params,
        refetch,
        fetcher: (*fetcher).clone(),
    }
}

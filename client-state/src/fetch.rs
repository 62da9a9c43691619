use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::Listener;

/// Distinguishes "never fetched" from "fetched, possibly empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    #[default]
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }
}

/// Loading/error/data triple for one hook instance.
///
/// While `is_loading` is true nothing can be assumed about the freshness of
/// `data` or `error`. Once it is false, either `error` is set or `data`
/// holds the most recently applied success.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            data: FetchState::NotFetched,
            is_loading: false,
            error: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// What to do with a response when calls overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Apply every settlement in the order it arrives, so a slow response to
    /// an old call can overwrite a faster response to a newer one.
    #[default]
    ArrivalOrder,
    /// Tag each call with a sequence number and ignore settlements from any
    /// call other than the most recently issued one.
    LatestIssued,
}

struct Inner<T> {
    resource: RefCell<Resource<T>>,
    issued: Cell<u64>,
    in_flight: Cell<usize>,
    policy: SettlePolicy,
    listener: RefCell<Option<Listener>>,
}

impl<T> Inner<T> {
    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

/// Runs async operations and records their outcome in a [`Resource`].
///
/// Calls are never cancelled; see [`SettlePolicy`] for how overlapping
/// calls are resolved.
pub struct Fetcher<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Fetcher<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> PartialEq for Fetcher<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + 'static> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new(SettlePolicy::default())
    }
}

impl<T: Clone + 'static> Fetcher<T> {
    pub fn new(policy: SettlePolicy) -> Self {
        Self {
            inner: Rc::new(Inner {
                resource: RefCell::new(Resource::default()),
                issued: Cell::new(0),
                in_flight: Cell::new(0),
                policy,
                listener: RefCell::new(None),
            }),
        }
    }

    pub fn set_listener(&self, listener: Listener) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    pub(crate) fn notify(&self) {
        self.inner.notify();
    }

    pub fn snapshot(&self) -> Resource<T> {
        self.inner.resource.borrow().clone()
    }

    /// Number of calls issued so far.
    pub fn issued(&self) -> u64 {
        self.inner.issued.get()
    }

    /// Start `request`, marking the resource as loading immediately.
    ///
    /// The returned future applies the outcome and then yields it, so a
    /// failure is both stored in `error` and handed back to the caller.
    pub fn run<Fut>(
        &self,
        request: Fut,
    ) -> LocalBoxFuture<'static, Result<T, String>>
    where
        Fut: Future<Output = Result<T, String>> + 'static,
    {
        let seq = self.begin();
        let inner = self.inner.clone();
        async move {
            let result = request.await;
            settle(&inner, seq, &result);
            result
        }
        .boxed_local()
    }

    /// Start `request()` only if `deps` differ from the value `tracker` last
    /// saw. The request is built from the caller's current closure, so it
    /// sees the values that came with the new dependencies.
    pub fn run_on_change<D, F, Fut>(
        &self,
        tracker: &DependencyTracker<D>,
        deps: &D,
        request: F,
    ) -> Option<LocalBoxFuture<'static, Result<T, String>>>
    where
        D: PartialEq + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, String>> + 'static,
    {
        tracker.changed(deps).then(|| self.run(request()))
    }

    fn begin(&self) -> u64 {
        let inner = &self.inner;
        let seq = inner.issued.get() + 1;
        inner.issued.set(seq);
        inner.in_flight.set(inner.in_flight.get() + 1);
        {
            let mut resource = inner.resource.borrow_mut();
            resource.is_loading = true;
            resource.error = None;
        }
        tracing::debug!(seq, "fetch issued");
        inner.notify();
        seq
    }
}

fn settle<T: Clone>(inner: &Inner<T>, seq: u64, result: &Result<T, String>) {
    let in_flight = inner.in_flight.get().saturating_sub(1);
    inner.in_flight.set(in_flight);
    let stale = inner.policy == SettlePolicy::LatestIssued
        && seq != inner.issued.get();
    {
        let mut resource = inner.resource.borrow_mut();
        if stale {
            tracing::debug!(seq, "discarding superseded response");
        } else {
            match result {
                Ok(data) => {
                    resource.data = FetchState::Fetched(data.clone());
                    resource.error = None;
                }
                Err(e) => {
                    tracing::warn!(seq, error = %e, "fetch failed");
                    resource.error = Some(e.clone());
                }
            }
        }
        resource.is_loading = in_flight > 0;
    }
    inner.notify();
}

/// Remembers the last dependency value so that a fetch is issued exactly
/// once per change.
pub struct DependencyTracker<D> {
    last: RefCell<Option<D>>,
}

impl<D> Default for DependencyTracker<D> {
    fn default() -> Self {
        Self {
            last: RefCell::new(None),
        }
    }
}

impl<D: PartialEq + Clone> DependencyTracker<D> {
    /// Record `deps`, returning true the first time and whenever they differ
    /// from the previous value.
    pub fn changed(&self, deps: &D) -> bool {
        let mut last = self.last.borrow_mut();
        if last.as_ref() == Some(deps) {
            return false;
        }
        *last = Some(deps.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;

    fn pending(
        rx: oneshot::Receiver<Result<u32, String>>,
    ) -> impl Future<Output = Result<u32, String>> {
        async move { rx.await.unwrap_or_else(|_| Err("cancelled".into())) }
    }

    #[tokio::test]
    async fn loading_spans_invocation_to_settlement() {
        let fetcher = Fetcher::<u32>::default();
        assert!(!fetcher.snapshot().is_loading);

        let (tx, rx) = oneshot::channel();
        let call = fetcher.run(pending(rx));
        assert!(fetcher.snapshot().is_loading);

        tx.send(Ok(5)).unwrap();
        assert_eq!(call.await, Ok(5));

        let resource = fetcher.snapshot();
        assert!(!resource.is_loading);
        assert_eq!(resource.data, FetchState::Fetched(5));
        assert_eq!(resource.error, None);
    }

    #[tokio::test]
    async fn failure_keeps_previous_data_and_is_returned() {
        let fetcher = Fetcher::<u32>::default();
        fetcher.run(async { Ok(1) }).await.unwrap();

        let result = fetcher.run(async { Err("boom".to_string()) }).await;
        assert_eq!(result, Err("boom".to_string()));

        let resource = fetcher.snapshot();
        assert_eq!(resource.data, FetchState::Fetched(1));
        assert_eq!(resource.error.as_deref(), Some("boom"));
        assert!(!resource.is_loading);
    }

    #[tokio::test]
    async fn new_call_clears_previous_error() {
        let fetcher = Fetcher::<u32>::default();
        let _ = fetcher.run(async { Err("boom".to_string()) }).await;
        let (_tx, rx) = oneshot::channel();
        let _call = fetcher.run(pending(rx));
        assert_eq!(fetcher.snapshot().error, None);
    }

    #[tokio::test]
    async fn arrival_order_lets_stale_response_win() {
        let fetcher = Fetcher::<u32>::new(SettlePolicy::ArrivalOrder);
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let old_call = fetcher.run(pending(old_rx));
        let new_call = fetcher.run(pending(new_rx));

        new_tx.send(Ok(2)).unwrap();
        new_call.await.unwrap();
        // the older call is still outstanding
        assert!(fetcher.snapshot().is_loading);

        old_tx.send(Ok(1)).unwrap();
        old_call.await.unwrap();
        let resource = fetcher.snapshot();
        assert_eq!(resource.data, FetchState::Fetched(1));
        assert!(!resource.is_loading);
    }

    #[tokio::test]
    async fn latest_issued_discards_stale_response() {
        let fetcher = Fetcher::<u32>::new(SettlePolicy::LatestIssued);
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let old_call = fetcher.run(pending(old_rx));
        let new_call = fetcher.run(pending(new_rx));

        new_tx.send(Ok(2)).unwrap();
        new_call.await.unwrap();
        old_tx.send(Err("late failure".into())).unwrap();
        // the caller still sees its own outcome
        assert!(old_call.await.is_err());

        let resource = fetcher.snapshot();
        assert_eq!(resource.data, FetchState::Fetched(2));
        assert_eq!(resource.error, None);
        assert_eq!(fetcher.issued(), 2);
    }

    #[tokio::test]
    async fn listener_sees_each_transition() {
        let fetcher = Fetcher::<u32>::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            let observed = fetcher.clone();
            fetcher.set_listener(Rc::new(move || {
                seen.borrow_mut().push(observed.snapshot().is_loading)
            }));
        }
        fetcher.run(async { Ok(3) }).await.unwrap();
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn tracker_reports_each_change_once() {
        let tracker = DependencyTracker::default();
        let changes: Vec<bool> =
            [1, 1, 2, 2, 2, 3].iter().map(|d| tracker.changed(d)).collect();
        assert_eq!(changes, vec![true, false, true, false, false, true]);
    }

    #[tokio::test]
    async fn one_call_per_dependency_change_with_current_inputs() {
        let fetcher = Fetcher::<u32>::default();
        let tracker = DependencyTracker::default();

        for id in [1, 1, 2] {
            // a fresh closure per render, capturing that render's id
            let call = fetcher.run_on_change(&tracker, &id, move || async move {
                Ok(id * 10)
            });
            if let Some(call) = call {
                call.await.unwrap();
            }
        }

        assert_eq!(fetcher.issued(), 2);
        assert_eq!(fetcher.snapshot().data, FetchState::Fetched(20));
    }

    #[tokio::test]
    async fn unchanged_dependencies_never_build_a_request() {
        let fetcher = Fetcher::<u32>::default();
        let tracker = DependencyTracker::default();
        let built = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let built = built.clone();
            let call = fetcher.run_on_change(&tracker, &"report", move || {
                built.set(built.get() + 1);
                async { Ok(1) }
            });
            if let Some(call) = call {
                call.await.unwrap();
            }
        }

        assert_eq!(built.get(), 1);
        assert_eq!(fetcher.issued(), 1);
    }

    #[tokio::test]
    async fn manual_call_hands_failure_back_to_awaiting_caller() {
        let fetcher = Fetcher::<u32>::default();
        let tracker = DependencyTracker::default();
        fetcher
            .run_on_change(&tracker, &1, || async { Ok(1) })
            .expect("first dependencies")
            .await
            .unwrap();

        let manual = fetcher.run(async { Err("PDF not found".to_string()) });
        assert_eq!(manual.await, Err("PDF not found".to_string()));
        assert_eq!(fetcher.snapshot().data, FetchState::Fetched(1));
    }
}

use std::future::Future;
use std::rc::Rc;

use client_state::{DependencyTracker, FetchState, Fetcher, Resource, SettlePolicy};
use futures::future::LocalBoxFuture;
use yew::prelude::*;

use crate::components::ErrorPanel;

type Run<T, A> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<T, String>>>;

/// Generic fetch hook return type. `A` is the operation's argument type
/// for hooks that accept per-call overrides.
pub struct FetchHookReturn<T, A = ()> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Repeat the dependency-triggered call
    pub refetch: Callback<()>,
    /// One manual call with different arguments
    pub refetch_with: Callback<A>,
    run: Run<T, A>,
}

impl<T: Clone, A> Clone for FetchHookReturn<T, A> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            refetch: self.refetch.clone(),
            refetch_with: self.refetch_with.clone(),
            run: self.run.clone(),
        }
    }
}

impl<T: Clone, A> FetchHookReturn<T, A> {
    fn new(
        resource: Resource<T>,
        refetch: Callback<()>,
        refetch_with: Callback<A>,
        run: Run<T, A>,
    ) -> Self {
        Self {
            data: resource.data,
            is_loading: resource.is_loading,
            error: resource.error,
            refetch,
            refetch_with,
            run,
        }
    }

    /// One manual call with `args` whose outcome is handed back. A failure
    /// is recorded in `error` as well.
    pub fn refetch_async(&self, args: A) -> LocalBoxFuture<'static, Result<T, String>> {
        (self.run)(args)
    }

    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// Without data this shows "Loading {context}..." or an [`ErrorPanel`]
    /// with a retry button. With data, `render_fn` receives the data, whether
    /// a refetch is in progress, and the error from a failed refetch (the
    /// previous data is still shown).
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        match self.data.as_ref() {
            None => match &self.error {
                Some(error) => html! {
                    <ErrorPanel
                        context={context.to_string()}
                        error={error.clone()}
                        on_retry={self.refetch.clone()}
                    />
                },
                None => html! {
                    <div class="text-center py-12">
                        <p class="text-neutral-600 dark:text-neutral-400">
                            {format!("Loading {context}...")}
                        </p>
                    </div>
                },
            },
            Some(data) => render_fn(data, self.is_loading, self.error.as_ref()),
        }
    }
}

/// A [`Fetcher`] that lives as long as the component and re-renders it on
/// every state change.
#[hook]
pub(crate) fn use_fetcher<T: Clone + 'static>(policy: SettlePolicy) -> Fetcher<T> {
    let update = use_force_update();
    let fetcher = use_memo((), move |_| {
        let fetcher = Fetcher::new(policy);
        fetcher.set_listener(Rc::new(move || update.force_update()));
        fetcher
    });
    (*fetcher).clone()
}

/// Generic fetch hook composer.
///
/// Fetches on mount and whenever `deps` change, and provides a refetch
/// callback. The fetch function captures its inputs from the closure and is
/// replaced on every render; `deps` decides when it is called. Overlapping calls settle in arrival
/// order; see [`use_fetch_with_policy`].
///
/// # Example
///
/// ```rust,ignore
/// #[hook]
/// pub fn use_document(id: DocumentId) -> FetchHookReturn<DocumentDetail> {
///     let client = use_api_client();
///     use_fetch(id, move || {
///         let client = client.clone();
///         async move { client.get_document(&id).await.map_err(|e| e.to_string()) }
///     })
/// }
/// ```
#[hook]
pub fn use_fetch<T, D, F, Fut>(deps: D, fetch_fn: F) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    use_fetch_with_policy(deps, SettlePolicy::ArrivalOrder, fetch_fn)
}

#[hook]
pub fn use_fetch_with_policy<T, D, F, Fut>(
    deps: D,
    policy: SettlePolicy,
    fetch_fn: F,
) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    use_fetch_with_args(deps, (), policy, move |()| fetch_fn())
}

/// Like [`use_fetch`], for operations that take arguments. Dependency
/// changes and `refetch` call the operation with `args`; `refetch_with`
/// makes one call with the given arguments instead.
#[hook]
pub fn use_fetch_with_args<T, A, D, F, Fut>(
    deps: D,
    args: A,
    policy: SettlePolicy,
    fetch_fn: F,
) -> FetchHookReturn<T, A>
where
    T: Clone + 'static,
    A: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<T, String>> + 'static,
{
    let fetcher = use_fetcher::<T>(policy);
    let tracker = use_memo((), |_| DependencyTracker::<D>::default());
    let fetch_fn = Rc::new(fetch_fn);

    let run: Run<T, A> = {
        let fetcher = fetcher.clone();
        let fetch_fn = fetch_fn.clone();
        Rc::new(move |args: A| fetcher.run(fetch_fn(args)))
    };

    let refetch = {
        let run = run.clone();
        let args = args.clone();
        use_callback(deps.clone(), move |_, _| super::drive(run(args.clone())))
    };

    let refetch_with = {
        let run = run.clone();
        Callback::from(move |args: A| super::drive(run(args)))
    };

    // Exactly one call per dependency change, built from this render's
    // closure and arguments
    {
        let fetcher = fetcher.clone();
        use_effect_with(deps, move |deps| {
            if let Some(call) =
                fetcher.run_on_change(&*tracker, deps, move || fetch_fn(args))
            {
                super::drive(call);
            }
        });
    }

    FetchHookReturn::new(fetcher.snapshot(), refetch, refetch_with, run)
}

//! State behind the UI's data hooks.
//!
//! Each controller here owns the loading/error/data bookkeeping for one hook
//! instance and notifies a listener whenever that state changes. The Yew
//! hooks in the `ui` crate hold a controller per component and use the
//! listener to trigger re-renders; everything in this crate is independent
//! of Yew and of the browser so it can be driven directly from tests.
//!
//! Everything is single-threaded: state is shared through `Rc`, and the
//! futures returned by the controllers are `!Send`.

pub mod debounce;
pub mod fetch;
pub mod pagination;
pub mod stats;
pub mod timer;
pub mod upload;

pub use debounce::Debouncer;
pub use fetch::{DependencyTracker, FetchState, Fetcher, Resource, SettlePolicy};
pub use pagination::{MergeParams, PaginatedFetcher, ParamsPatch};
pub use stats::{
    BasicStats, DEFAULT_REFRESH_INTERVAL, StatsSource, fetch_basic_counts,
    fetch_detailed_stats, refresh_every,
};
pub use timer::Timer;
pub use upload::{
    TransportEvent, UploadEvent, UploadForm, UploadSession, UploadState,
    UploadTransport, Uploader, ValidationError,
};

#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimer;
#[cfg(not(target_arch = "wasm32"))]
pub use upload::ReqwestTransport;

use std::rc::Rc;

/// Callback run after every state change.
pub type Listener = Rc<dyn Fn()>;

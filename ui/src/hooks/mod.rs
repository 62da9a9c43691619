pub mod use_api_client;
pub mod use_debounced_callback;
pub mod use_fetch;
pub mod use_file_upload;
pub mod use_paginated_fetch;
pub mod use_stats;

pub use use_api_client::use_api_client;
pub use use_debounced_callback::use_debounced_callback;
pub use use_fetch::{FetchHookReturn, use_fetch, use_fetch_with_args, use_fetch_with_policy};
pub use use_file_upload::{FileUploadHandle, use_file_upload};
pub use use_paginated_fetch::{PaginatedFetchReturn, use_paginated_fetch};
pub use use_stats::{use_stats, use_summary_stats};

use futures::future::LocalBoxFuture;

/// Drive a controller call to completion. Its outcome has already been
/// recorded in the controller's state.
pub(crate) fn drive<T: 'static>(call: LocalBoxFuture<'static, Result<T, String>>) {
    yew::platform::spawn_local(async move {
        let _ = call.await;
    });
}

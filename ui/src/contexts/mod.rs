mod api_client;
pub mod toast;

pub use api_client::ApiClientContext;
pub use toast::{ToastProvider, use_toast};

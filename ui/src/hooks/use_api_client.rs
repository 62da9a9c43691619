use payloads::APIClient;
use yew::prelude::*;

use crate::contexts::ApiClientContext;

/// The client provided by the [`App`](crate::App), or a freshly configured
/// one when rendered outside it.
#[hook]
pub fn use_api_client() -> APIClient {
    use_context::<ApiClientContext>()
        .map(|context| context.client().clone())
        .unwrap_or_else(crate::get_api_client)
}

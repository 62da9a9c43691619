
use payloads::{APIClient, ClientConfig, DocumentId};
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod contexts;
mod hooks;
pub mod logs;
mod pages;
mod timer;
mod transport;

use components::ToastContainer;
use contexts::ToastProvider;

pub use contexts::ApiClientContext;

/// Build the API client. The address comes from `BACKEND_URL` at build
/// time, falling back to the page's own origin.
pub fn get_api_client() -> APIClient {
    let address = option_env!("BACKEND_URL")
        .map(str::to_string)
        .or_else(|| {
            web_sys::window().and_then(|window| window.location().origin().ok())
        })
        .unwrap_or_default();

    APIClient::new(ClientConfig::new(address))
}

#[derive(Properties, PartialEq, Default)]
pub struct AppProps {
    /// Overrides the client built by [`get_api_client`].
    #[prop_or_default]
    pub api_client: Option<ApiClientContext>,
}

#[function_component]
pub fn App(props: &AppProps) -> Html {
    let default_client = use_memo((), |_| ApiClientContext::new(get_api_client()));
    let api_client = props
        .api_client
        .clone()
        .unwrap_or_else(|| (*default_client).clone());

    html! {
        <ContextProvider<ApiClientContext> context={api_client}>
            <ToastProvider>
                <BrowserRouter>
                    <div class="min-h-screen bg-white dark:bg-neutral-900 text-neutral-900 dark:text-neutral-100 transition-colors">
                        <components::Header />
                        <Switch<Route> render={switch} />
                        <ToastContainer />
                    </div>
                </BrowserRouter>
            </ToastProvider>
        </ContextProvider<ApiClientContext>>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/documents")]
    Documents,
    #[at("/documents/:id")]
    DocumentDetail { id: u64 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    let page = match routes {
        Route::Home => html! { <pages::HomePage /> },
        Route::Documents => html! { <pages::DocumentsPage /> },
        Route::DocumentDetail { id } => {
            html! { <pages::DocumentDetailPage id={DocumentId(id)} /> }
        }
        Route::NotFound => html! { <pages::NotFoundPage /> },
    };

    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
            {page}
        </main>
    }
}

use std::time::Duration;

use client_state::{ParamsPatch, SettlePolicy};
use payloads::format::{format_date, format_file_size};
use payloads::requests::PaginationParams;
use payloads::responses::Document;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{ErrorPanel, PaginationControls, UploadPanel};
use crate::contexts::use_toast;
use crate::hooks::{use_api_client, use_debounced_callback, use_paginated_fetch};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[function_component]
pub fn DocumentsPage() -> Html {
    let client = use_api_client();
    let documents = use_paginated_fetch(
        PaginationParams::default(),
        SettlePolicy::ArrivalOrder,
        move |params: PaginationParams| {
            let client = client.clone();
            async move {
                client
                    .list_documents(&params)
                    .await
                    .map_err(|e| e.to_string())
            }
        },
    );
    let search_input = use_state(|| documents.params.search.clone());
    let toast = use_toast();

    let search = {
        let update_params = documents.update_params.clone();
        use_debounced_callback(
            SEARCH_DEBOUNCE,
            Callback::from(move |term: String| {
                update_params.emit(ParamsPatch::search(term).with_page(1))
            }),
        )
    };

    let on_search_input = {
        let search_input = search_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            search_input.set(input.value());
            search.emit(input.value());
        })
    };

    let on_page_change = documents.update_params.reform(ParamsPatch::page);

    let on_uploaded = {
        let documents = documents.clone();
        let toast = toast.clone();
        Callback::from(move |_: Document| {
            let reload = documents.refetch_async(&ParamsPatch::default());
            let toast = toast.clone();
            yew::platform::spawn_local(async move {
                if let Err(e) = reload.await {
                    toast.error(format!("Could not refresh documents: {e}"));
                }
            });
        })
    };

    let list = match documents.data.as_ref() {
        None if documents.error.is_none() => html! {
            <p class="text-center py-12 text-neutral-500">{"Loading documents..."}</p>
        },
        None => html! {},
        Some(page) if page.is_empty() => html! {
            <p class="text-center py-12 text-neutral-500">{"No documents found"}</p>
        },
        Some(page) => html! {
            <>
                <ul class={classes!(
                    "divide-y", "divide-neutral-200", "dark:divide-neutral-700",
                    documents.is_loading.then_some("opacity-75")
                )}>
                    {for page.data.iter().map(|document| html! {
                        <DocumentListItem key={document.id.0} document={document.clone()} />
                    })}
                </ul>
                <PaginationControls
                    page={page.page}
                    total_pages={page.total_pages}
                    total_items={page.total_items}
                    items_per_page={page.items_per_page}
                    {on_page_change}
                    is_loading={documents.is_loading}
                />
            </>
        },
    };

    let on_retry = documents.refetch.reform(|_: ()| ParamsPatch::default());

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-8">
            <section class="lg:col-span-2 space-y-4">
                <h1 class="text-2xl font-semibold">{"Documents"}</h1>
                <input
                    type="search"
                    placeholder="Search documents..."
                    value={(*search_input).clone()}
                    oninput={on_search_input}
                    class="w-full border border-neutral-300 dark:border-neutral-600 rounded \
                           px-4 py-2 bg-transparent"
                />
                if let Some(error) = &documents.error {
                    <ErrorPanel context="documents" error={error.clone()} {on_retry} />
                }
                {list}
            </section>
            <aside>
                <UploadPanel {on_uploaded} />
            </aside>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ItemProps {
    document: Document,
}

#[function_component]
fn DocumentListItem(props: &ItemProps) -> Html {
    let document = &props.document;

    html! {
        <li class="py-4">
            <Link<Route>
                to={Route::DocumentDetail { id: document.id.0 }}
                classes="block hover:bg-neutral-50 dark:hover:bg-neutral-800 rounded px-2 -mx-2"
            >
                <p class="font-medium truncate">{document.display_name()}</p>
                <p class="text-sm text-neutral-500">
                    {format!(
                        "{} • {} pages • {}",
                        format_file_size(document.file_size),
                        document.page_count,
                        format_date(document.created_at, jiff::tz::TimeZone::system())
                    )}
                </p>
            </Link<Route>>
        </li>
    }
}

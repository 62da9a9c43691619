use std::time::Duration;

use client_state::{ParamsPatch, SettlePolicy};
use payloads::format::{format_date, format_file_size};
use payloads::requests::PaginationParams;
use payloads::responses::Document;
use yew::prelude::*;

use super::{ErrorPanel, Modal};
use crate::hooks::{use_api_client, use_debounced_callback, use_paginated_fetch};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const MODAL_PAGE_SIZE: u32 = 50;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub on_close: Callback<()>,
    /// Called with the chosen document when the user proceeds
    pub on_select: Callback<Document>,
}

/// Pick a document to summarize. Search input is debounced, and results
/// from superseded searches are ignored.
#[function_component]
pub fn DocumentSelectionModal(props: &Props) -> Html {
    let client = use_api_client();
    let documents = use_paginated_fetch(
        PaginationParams::new(1, MODAL_PAGE_SIZE),
        SettlePolicy::LatestIssued,
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
    let search_input = use_state(String::new);
    let selected = use_state(|| None::<Document>);

    let search = {
        let update_params = documents.update_params.clone();
        use_debounced_callback(
            SEARCH_DEBOUNCE,
            Callback::from(move |term: String| {
                update_params.emit(ParamsPatch::search(term).with_page(1))
            }),
        )
    };

    let on_input = {
        let search_input = search_input.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let value = input.value();
            search_input.set(value.clone());
            search.emit(value);
        })
    };

    let on_proceed = {
        let selected = selected.clone();
        let on_select = props.on_select.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(document) = (*selected).clone() {
                on_select.emit(document);
            }
            on_close.emit(());
        })
    };

    let list = match documents.data.as_ref() {
        _ if documents.is_loading => html! {
            <div class="text-center py-8 text-neutral-500">{"Loading documents..."}</div>
        },
        Some(page) if page.is_empty() => html! {
            <div class="text-center py-8">
                <h3 class="text-lg font-medium mb-2">{"No Documents Found"}</h3>
                <p class="text-neutral-500">
                    {if search_input.is_empty() {
                        "Upload some PDF documents first."
                    } else {
                        "Try adjusting your search terms."
                    }}
                </p>
            </div>
        },
        Some(page) => html! {
            <div class="space-y-3">
                {for page.data.iter().map(|document| {
                    let is_selected =
                        (*selected).as_ref().is_some_and(|s| s.id == document.id);
                    let onclick = {
                        let selected = selected.clone();
                        let document = document.clone();
                        Callback::from(move |_: MouseEvent| {
                            selected.set(Some(document.clone()))
                        })
                    };
                    html! {
                        <DocumentRow
                            key={document.id.0}
                            document={document.clone()}
                            {is_selected}
                            {onclick}
                        />
                    }
                })}
            </div>
        },
        None => html! {},
    };

    let footer = html! {
        <>
            <button
                onclick={props.on_close.reform(|_: MouseEvent| ())}
                class="flex-1 border border-neutral-300 dark:border-neutral-600 py-3 px-4 rounded"
            >
                {"Cancel"}
            </button>
            <button
                onclick={on_proceed}
                disabled={selected.is_none()}
                class="flex-1 border border-green-600 text-green-600 py-3 px-4 rounded \
                       disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {"Generate Summary"}
            </button>
        </>
    };

    html! {
        <Modal
            title="Select Document"
            on_close={props.on_close.clone()}
            max_width="max-w-2xl"
            {footer}
        >
            <input
                type="text"
                placeholder="Search documents..."
                value={(*search_input).clone()}
                oninput={on_input}
                class="w-full mb-4 border border-neutral-300 dark:border-neutral-600 rounded \
                       px-4 py-3 bg-transparent focus:outline-none focus:ring-2 \
                       focus:ring-blue-500"
            />
            if let Some(error) = &documents.error {
                <div class="mb-4">
                    <ErrorPanel context="documents" error={error.clone()} />
                </div>
            }
            {list}
        </Modal>
    }
}

#[derive(Properties, PartialEq)]
struct RowProps {
    document: Document,
    is_selected: bool,
    onclick: Callback<MouseEvent>,
}

#[function_component]
fn DocumentRow(props: &RowProps) -> Html {
    let document = &props.document;
    let border = if props.is_selected {
        "border-blue-500 bg-blue-500/5"
    } else {
        "border-neutral-200 dark:border-neutral-700 hover:border-neutral-400"
    };

    html! {
        <div
            onclick={props.onclick.clone()}
            class={format!("border rounded-lg p-4 cursor-pointer transition-all {border}")}
        >
            <h3 class="font-medium truncate">{document.display_name()}</h3>
            <div class="flex items-center gap-4 text-sm text-neutral-500 mt-1">
                <span>{format_file_size(document.file_size)}</span>
                <span>{format!("{} pages", document.page_count)}</span>
                <span>{format_date(document.created_at, jiff::tz::TimeZone::system())}</span>
            </div>
        </div>
    }
}

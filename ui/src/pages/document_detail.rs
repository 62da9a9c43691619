use client_state::SettlePolicy;
use payloads::DocumentId;
use payloads::format::{download_filename, format_date, format_file_size};
use payloads::responses::{DocumentDetail, DownloadedFile, Summary};
use wasm_bindgen::{JsCast, JsValue};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{ConfirmationModal, MarkdownText, SummaryModal};
use crate::contexts::use_toast;
use crate::hooks::{use_api_client, use_fetch_with_args};

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: DocumentId,
}

#[derive(Clone, Copy, PartialEq)]
enum Dialog {
    Closed,
    ConfirmDelete,
    Summarize,
}

#[function_component]
pub fn DocumentDetailPage(props: &Props) -> Html {
    let id = props.id;
    let client = use_api_client();
    let document = {
        let client = client.clone();
        use_fetch_with_args(id, id, SettlePolicy::ArrivalOrder, move |id: DocumentId| {
            let client = client.clone();
            async move { client.get_document(&id).await.map_err(|e| e.to_string()) }
        })
    };
    let dialog = use_state(|| Dialog::Closed);
    let deleting = use_state(|| false);
    let delete_error = use_state(|| None::<String>);
    let toast = use_toast();
    let navigator = use_navigator();

    let open = |target: Dialog| {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(target))
    };

    let close_dialog = {
        let dialog = dialog.clone();
        let delete_error = delete_error.clone();
        Callback::from(move |_: ()| {
            delete_error.set(None);
            dialog.set(Dialog::Closed);
        })
    };

    let on_download = {
        let client = client.clone();
        let toast = toast.clone();
        let name = document
            .data
            .as_ref()
            .map(|detail| detail.display_name().to_string())
            .unwrap_or_default();
        Callback::from(move |_: MouseEvent| {
            let client = client.clone();
            let toast = toast.clone();
            let name = name.clone();
            yew::platform::spawn_local(async move {
                match client.download_document(&id).await {
                    Ok(file) => {
                        if let Err(e) = save_file(&file, &name) {
                            tracing::error!(error = ?e, "could not save download");
                            toast.error("Failed to download PDF");
                        }
                    }
                    Err(e) => toast.error(e.to_string()),
                }
            });
        })
    };

    let on_delete = {
        let client = client.clone();
        let deleting = deleting.clone();
        let delete_error = delete_error.clone();
        let toast = toast.clone();
        Callback::from(move |_: ()| {
            let client = client.clone();
            let deleting = deleting.clone();
            let delete_error = delete_error.clone();
            let toast = toast.clone();
            let navigator = navigator.clone();
            deleting.set(true);
            yew::platform::spawn_local(async move {
                let result = client.delete_document(&id).await;
                deleting.set(false);
                match result {
                    Ok(_) => {
                        tracing::info!(%id, "document deleted");
                        toast.success("Document deleted");
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Documents);
                        }
                    }
                    Err(e) => delete_error.set(Some(e.to_string())),
                }
            });
        })
    };

    let on_generated = {
        let document = document.clone();
        let toast = toast.clone();
        Callback::from(move |_: Summary| {
            toast.success("Summary generated");
            let reload = document.refetch_async(id);
            let toast = toast.clone();
            yew::platform::spawn_local(async move {
                if let Err(e) = reload.await {
                    toast.error(format!("Could not reload document: {e}"));
                }
            });
        })
    };

    let content = document.render("document", |detail, is_loading, error| {
        html! {
            <div class="space-y-8">
                <div class="flex flex-wrap items-start justify-between gap-4">
                    <div>
                        <h1 class="text-2xl font-semibold">{detail.display_name()}</h1>
                        <p class="text-sm text-neutral-500 mt-1">{&detail.filename}</p>
                    </div>
                    <div class="flex gap-3">
                        <button onclick={on_download.clone()} class={BUTTON}>{"Download"}</button>
                        <button onclick={open(Dialog::Summarize)} class={BUTTON}>
                            {"Generate Summary"}
                        </button>
                        <button
                            onclick={open(Dialog::ConfirmDelete)}
                            class="px-4 py-2 rounded-md text-sm font-medium text-white bg-red-600 hover:bg-red-700"
                        >
                            {"Delete"}
                        </button>
                    </div>
                </div>
                if is_loading {
                    <p class="text-sm text-neutral-500">{"Refreshing..."}</p>
                }
                if let Some(error) = error {
                    <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
                }
                <Metadata detail={detail.clone()} />
                <Summaries summaries={detail.summaries.clone()} />
            </div>
        }
    });

    let modal = match (*dialog, document.data.as_ref()) {
        (Dialog::ConfirmDelete, Some(detail)) => html! {
            <ConfirmationModal
                title="Delete Document"
                message={format!("{} and all its summaries will be removed.", detail.display_name())}
                confirm_text="Delete"
                on_confirm={on_delete}
                on_close={close_dialog.clone()}
                is_loading={*deleting}
                error_message={(*delete_error).clone().map(AttrValue::from)}
            />
        },
        (Dialog::Summarize, Some(detail)) => html! {
            <SummaryModal
                document={detail.document()}
                on_close={close_dialog.clone()}
                {on_generated}
            />
        },
        _ => html! {},
    };

    html! {
        <>
            <Link<Route> to={Route::Documents} classes="text-sm text-blue-600 hover:underline">
                {"← Back to documents"}
            </Link<Route>>
            <div class="mt-4">{content}</div>
            {modal}
        </>
    }
}

const BUTTON: &str = "px-4 py-2 rounded-md text-sm font-medium border \
                      border-neutral-300 dark:border-neutral-600 \
                      hover:bg-neutral-50 dark:hover:bg-neutral-700";

#[derive(Properties, PartialEq)]
struct MetadataProps {
    detail: DocumentDetail,
}

#[function_component]
fn Metadata(props: &MetadataProps) -> Html {
    let detail = &props.detail;
    let tz = jiff::tz::TimeZone::system();
    let rows = [
        ("Size", format_file_size(detail.file_size)),
        ("Pages", detail.page_count.to_string()),
        ("Uploaded", format_date(detail.created_at, tz.clone())),
        ("Updated", format_date(detail.updated_at, tz)),
    ];

    html! {
        <dl class="grid grid-cols-2 sm:grid-cols-4 gap-4 border border-neutral-200 \
                   dark:border-neutral-700 rounded-lg p-6">
            {for rows.into_iter().map(|(label, value)| html! {
                <div>
                    <dt class="text-sm text-neutral-500">{label}</dt>
                    <dd class="font-medium">{value}</dd>
                </div>
            })}
        </dl>
    }
}

#[derive(Properties, PartialEq)]
struct SummariesProps {
    summaries: Vec<Summary>,
}

#[function_component]
fn Summaries(props: &SummariesProps) -> Html {
    if props.summaries.is_empty() {
        return html! {
            <p class="text-neutral-500">{"No summaries yet."}</p>
        };
    }

    html! {
        <section class="space-y-6">
            <h2 class="text-lg font-medium">{"Summaries"}</h2>
            {for props.summaries.iter().map(|summary| html! {
                <article
                    key={summary.id.0}
                    class="border border-neutral-200 dark:border-neutral-700 rounded-lg p-6"
                >
                    <div class="flex flex-wrap gap-3 text-xs text-neutral-500 mb-4">
                        <span>{summary.style.label()}</span>
                        <span>{summary.language.label()}</span>
                        <span>{format!("{:.1}s", summary.summary_time)}</span>
                        <span>{format_date(summary.created_at, jiff::tz::TimeZone::system())}</span>
                    </div>
                    <MarkdownText text={summary.content.clone()} />
                </article>
            })}
        </section>
    }
}

/// Hand downloaded bytes to the browser as a file save.
fn save_file(file: &DownloadedFile, display_name: &str) -> Result<(), JsValue> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(file.content_type.as_deref().unwrap_or("application/pdf"));
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: web_sys::HtmlAnchorElement =
        document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&download_filename(file.filename.as_deref(), display_name));
    anchor.click();

    web_sys::Url::revoke_object_url(&url)
}

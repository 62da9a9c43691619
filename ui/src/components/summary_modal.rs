use payloads::format::format_file_size;
use payloads::requests::GenerateSummary;
use payloads::responses::{Document, Summary};
use payloads::{SummaryLanguage, SummaryStyle};
use yew::prelude::*;

use super::Modal;
use crate::hooks::use_api_client;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub document: Document,
    pub on_close: Callback<()>,
    /// Called with the created summary, just before the modal closes
    pub on_generated: Callback<Summary>,
}

#[function_component]
pub fn SummaryModal(props: &Props) -> Html {
    let client = use_api_client();
    let style = use_state(SummaryStyle::default);
    let language = use_state(SummaryLanguage::default);
    let generating = use_state(|| false);
    let error = use_state(|| None::<String>);

    let on_generate = {
        let style = style.clone();
        let language = language.clone();
        let generating = generating.clone();
        let error = error.clone();
        let id = props.document.id;
        let on_generated = props.on_generated.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |_: MouseEvent| {
            let client = client.clone();
            let details = GenerateSummary {
                style: *style,
                language: *language,
            };
            let generating = generating.clone();
            let error = error.clone();
            let on_generated = on_generated.clone();
            let on_close = on_close.clone();

            generating.set(true);
            error.set(None);
            yew::platform::spawn_local(async move {
                match client.generate_summary(&id, &details).await {
                    Ok(summary) => {
                        tracing::info!(id = %summary.id, "summary generated");
                        generating.set(false);
                        on_generated.emit(summary);
                        on_close.emit(());
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "summary generation failed");
                        generating.set(false);
                        error.set(Some(e.to_string()));
                    }
                }
            });
        })
    };

    let style_options = SummaryStyle::ALL.iter().map(|&option| {
        let onchange = {
            let style = style.clone();
            Callback::from(move |_: Event| style.set(option))
        };
        html! {
            <label class={option_class(*style == option)}>
                <input
                    type="radio"
                    name="style"
                    value={option.as_str()}
                    checked={*style == option}
                    {onchange}
                />
                <div>
                    <div class="font-medium">{option.label()}</div>
                    <div class="text-sm text-neutral-500">{option.description()}</div>
                </div>
            </label>
        }
    });

    let language_options = SummaryLanguage::ALL.iter().map(|&option| {
        let onchange = {
            let language = language.clone();
            Callback::from(move |_: Event| language.set(option))
        };
        html! {
            <label class={option_class(*language == option)}>
                <input
                    type="radio"
                    name="language"
                    value={option.as_str()}
                    checked={*language == option}
                    {onchange}
                />
                <span class="font-medium">{option.label()}</span>
            </label>
        }
    });

    let footer = html! {
        <>
            <button
                onclick={props.on_close.reform(|_: MouseEvent| ())}
                disabled={*generating}
                class="flex-1 border border-neutral-300 dark:border-neutral-600 py-3 px-4 rounded \
                       disabled:opacity-50"
            >
                {"Cancel"}
            </button>
            <button
                onclick={on_generate}
                disabled={*generating}
                class="flex-1 border border-blue-600 text-blue-600 py-3 px-4 rounded \
                       disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {if *generating { "Generating..." } else { "Generate Summary" }}
            </button>
        </>
    };

    let document = &props.document;

    html! {
        <Modal
            title="Generate Summary"
            on_close={props.on_close.clone()}
            close_on_backdrop={!*generating}
            {footer}
        >
            <div class="border border-neutral-200 dark:border-neutral-700 rounded-lg p-4 mb-6">
                <h3 class="font-medium truncate">{document.display_name()}</h3>
                <p class="text-sm text-neutral-500">
                    {format!(
                        "{} pages • {}",
                        document.page_count,
                        format_file_size(document.file_size)
                    )}
                </p>
            </div>

            <fieldset class="mb-6">
                <legend class="block font-medium mb-3">{"Summary Style"}</legend>
                <div class="space-y-2">{for style_options}</div>
            </fieldset>

            <fieldset class="mb-6">
                <legend class="block font-medium mb-3">{"Language"}</legend>
                <div class="grid grid-cols-2 gap-2">{for language_options}</div>
            </fieldset>

            if let Some(error) = &*error {
                <div class="border border-red-500 rounded-lg p-4 bg-red-500/5 text-sm text-red-600">
                    {error}
                </div>
            }
        </Modal>
    }
}

fn option_class(selected: bool) -> &'static str {
    if selected {
        "flex items-center gap-3 p-3 border rounded cursor-pointer border-blue-500 bg-blue-500/5"
    } else {
        "flex items-center gap-3 p-3 border rounded cursor-pointer \
         border-neutral-200 dark:border-neutral-700 hover:border-neutral-400"
    }
}

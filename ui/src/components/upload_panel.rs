use client_state::UploadForm;
use payloads::MAX_UPLOAD_SIZE;
use payloads::format::format_file_size;
use payloads::responses::Document;
use yew::prelude::*;

use super::ProgressBar;
use crate::contexts::use_toast;
use crate::hooks::use_file_upload;
use crate::transport::read_file;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Called with each stored document
    pub on_uploaded: Callback<Document>,
}

#[function_component]
pub fn UploadPanel(props: &Props) -> Html {
    let upload = use_file_upload();
    let toast = use_toast();
    let file_input = use_node_ref();
    let title = use_state(String::new);
    let file = use_state(|| None::<web_sys::File>);

    let on_file_change = {
        let file = file.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            file.set(input.files().and_then(|files| files.get(0)));
        })
    };

    let on_title_input = {
        let title = title.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            title.set(input.value());
        })
    };

    let on_submit = {
        let upload = upload.clone();
        let file = file.clone();
        let title = title.clone();
        let file_input = file_input.clone();
        let on_uploaded = props.on_uploaded.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(selected) = (*file).clone() else {
                return;
            };
            let upload = upload.clone();
            let file = file.clone();
            let title = title.clone();
            let file_input = file_input.clone();
            let toast = toast.clone();
            let on_uploaded = on_uploaded.clone();

            yew::platform::spawn_local(async move {
                let bytes = match read_file(&selected).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        toast.error(e);
                        return;
                    }
                };
                let form = UploadForm::pdf(selected.name(), bytes)
                    .with_title((*title).clone());
                match upload.upload(form).finish(|_| {}).await {
                    Ok(document) => {
                        toast.success(format!(
                            "Uploaded {}",
                            document.display_name()
                        ));
                        title.set(String::new());
                        file.set(None);
                        if let Some(input) =
                            file_input.cast::<web_sys::HtmlInputElement>()
                        {
                            input.set_value("");
                        }
                        on_uploaded.emit(document);
                    }
                    Err(e) => toast.error(e),
                }
            });
        })
    };

    html! {
        <form
            onsubmit={on_submit}
            class="border border-neutral-200 dark:border-neutral-700 rounded-lg p-6 space-y-4"
        >
            <h2 class="text-lg font-medium">{"Upload PDF"}</h2>
            <p class="text-sm text-neutral-500">
                {format!("PDF files up to {}", format_file_size(MAX_UPLOAD_SIZE))}
            </p>
            <input
                ref={file_input}
                type="file"
                accept="application/pdf,.pdf"
                onchange={on_file_change}
                disabled={upload.uploading}
                class="block w-full text-sm"
            />
            <input
                type="text"
                placeholder="Title (optional)"
                value={(*title).clone()}
                oninput={on_title_input}
                disabled={upload.uploading}
                class="w-full border border-neutral-300 dark:border-neutral-600 rounded px-3 py-2 \
                       bg-transparent"
            />
            if upload.uploading {
                <ProgressBar percent={upload.progress} label="Uploading" />
            }
            if let Some(error) = &upload.error {
                <p class="text-sm text-red-600 dark:text-red-400">{error}</p>
            }
            <button
                type="submit"
                disabled={upload.uploading || file.is_none()}
                class="px-4 py-2 rounded-md text-sm font-medium text-white bg-blue-600 \
                       hover:bg-blue-700 disabled:opacity-50 disabled:cursor-not-allowed"
            >
                {if upload.uploading { "Uploading..." } else { "Upload" }}
            </button>
        </form>
    }
}

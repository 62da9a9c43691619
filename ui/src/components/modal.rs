use wasm_bindgen::JsCast;
use yew::prelude::*;

/// A dialog over a dimmed backdrop, with a title bar and close button.
///
/// Clicking the backdrop closes it unless `close_on_backdrop` is false,
/// e.g. while a request started from the dialog is still running.
#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: AttrValue,
    pub children: Html,
    /// Called when the user clicks the backdrop or the close button
    pub on_close: Callback<()>,
    /// Optional action row rendered below the body
    #[prop_or_default]
    pub footer: Option<Html>,
    #[prop_or_else(|| AttrValue::from("max-w-md"))]
    pub max_width: AttrValue,
    #[prop_or(true)]
    pub close_on_backdrop: bool,
}

#[function_component]
pub fn Modal(props: &ModalProps) -> Html {
    let backdrop_ref = use_node_ref();

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        let backdrop_ref = backdrop_ref.clone();
        let close_on_backdrop = props.close_on_backdrop;

        Callback::from(move |e: MouseEvent| {
            if !close_on_backdrop {
                return;
            }

            if let Some(backdrop_element) =
                backdrop_ref.cast::<web_sys::Element>()
                && let Some(target) = e.target()
                && target.dyn_ref::<web_sys::Element>()
                    == Some(&backdrop_element)
            {
                on_close.emit(());
            }
        })
    };

    let on_close_click = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div
            ref={backdrop_ref}
            onclick={on_backdrop_click}
            class="fixed inset-0 bg-black bg-opacity-50 z-50 flex
                   items-center justify-center p-4"
        >
            <div
                class={format!(
                    "bg-white dark:bg-neutral-800 rounded-lg shadow-xl \
                     w-full max-h-[80vh] flex flex-col {}",
                    props.max_width
                )}
            >
                <div class="flex items-center justify-between p-6 border-b \
                            border-neutral-200 dark:border-neutral-700">
                    <h2 class="text-xl font-medium">{&props.title}</h2>
                    <button
                        onclick={on_close_click}
                        class="text-neutral-400 hover:text-neutral-700 \
                               dark:hover:text-white transition-colors"
                        title="Close"
                    >
                        {"×"}
                    </button>
                </div>
                <div class="flex-1 overflow-y-auto p-6">
                    {props.children.clone()}
                </div>
                if let Some(footer) = &props.footer {
                    <div class="flex items-center gap-3 p-6 border-t \
                                border-neutral-200 dark:border-neutral-700">
                        {footer.clone()}
                    </div>
                }
            </div>
        </div>
    }
}

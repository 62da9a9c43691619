use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// What failed to load, e.g. "documents"
    pub context: AttrValue,
    pub error: AttrValue,
    /// Shows a retry button when set
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

#[function_component]
pub fn ErrorPanel(props: &Props) -> Html {
    html! {
        <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border \
                    border-red-200 dark:border-red-800 flex items-center \
                    justify-between gap-4">
            <p class="text-sm text-red-700 dark:text-red-400">
                {format!("Error loading {}: {}", props.context, props.error)}
            </p>
            if let Some(on_retry) = &props.on_retry {
                <button
                    onclick={on_retry.reform(|_: MouseEvent| ())}
                    class="text-sm font-medium text-red-700 dark:text-red-400 \
                           underline hover:no-underline"
                >
                    {"Retry"}
                </button>
            }
        </div>
    }
}

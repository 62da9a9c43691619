use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Percentage in `[0, 100]`
    pub percent: f64,
    #[prop_or_default]
    pub label: Option<AttrValue>,
}

#[function_component]
pub fn ProgressBar(props: &Props) -> Html {
    let percent = props.percent.clamp(0.0, 100.0);

    html! {
        <div class="w-full">
            <div class="flex justify-between text-xs text-neutral-600 dark:text-neutral-400 mb-1">
                <span>{props.label.clone().unwrap_or_default()}</span>
                <span>{format!("{percent:.0}%")}</span>
            </div>
            <div
                class="w-full h-2 rounded-full bg-neutral-200 dark:bg-neutral-700 overflow-hidden"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow={format!("{percent:.0}")}
            >
                <div
                    class="h-full bg-blue-600 transition-all duration-200"
                    style={format!("width: {percent}%")}
                />
            </div>
        </div>
    }
}

use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component]
pub fn Header() -> Html {
    let link_class = "text-sm font-medium text-neutral-600 dark:text-neutral-300 \
                      hover:text-neutral-900 dark:hover:text-white transition-colors";

    html! {
        <header class="bg-white dark:bg-neutral-800 border-b border-neutral-200 dark:border-neutral-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex-shrink-0">
                        <Link<Route> to={Route::Home} classes="text-xl font-semibold text-neutral-900 dark:text-white">
                            {"PDF Summaries"}
                        </Link<Route>>
                    </div>
                    <nav class="flex items-center space-x-6">
                        <Link<Route> to={Route::Home} classes={link_class}>{"Dashboard"}</Link<Route>>
                        <Link<Route> to={Route::Documents} classes={link_class}>{"Documents"}</Link<Route>>
                    </nav>
                </div>
            </div>
        </header>
    }
}

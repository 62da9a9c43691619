use client_state::DEFAULT_REFRESH_INTERVAL;
use payloads::responses::{Document, Summary, SummaryStats};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;
use crate::components::{DocumentSelectionModal, SummaryModal};
use crate::hooks::{use_stats, use_summary_stats};

#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    SelectDocument,
    Summarize(Document),
}

#[function_component]
pub fn HomePage() -> Html {
    let stats = use_stats(Some(DEFAULT_REFRESH_INTERVAL));
    let summary_stats = use_summary_stats();
    let dialog = use_state(|| Dialog::Closed);
    let navigator = use_navigator();

    let open_selection = {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Dialog::SelectDocument))
    };

    let close_dialog = {
        let dialog = dialog.clone();
        Callback::from(move |_: ()| dialog.set(Dialog::Closed))
    };

    let on_document_selected = {
        let dialog = dialog.clone();
        Callback::from(move |document: Document| {
            dialog.set(Dialog::Summarize(document))
        })
    };

    let on_generated = {
        let refetch_stats = stats.refetch.clone();
        let refetch_breakdown = summary_stats.refetch.clone();
        Callback::from(move |summary: Summary| {
            refetch_stats.emit(());
            refetch_breakdown.emit(());
            if let Some(navigator) = &navigator {
                navigator.push(&Route::DocumentDetail {
                    id: summary.pdf_id.0,
                });
            }
        })
    };

    let counts = stats.render("statistics", |counts, is_loading, _| {
        html! {
            <div class={classes!(
                "grid", "grid-cols-1", "sm:grid-cols-2", "gap-4",
                is_loading.then_some("opacity-75")
            )}>
                <StatCard label="Documents" value={counts.total_documents.to_string()} />
                <StatCard label="Summaries" value={counts.total_summaries.to_string()} />
            </div>
        }
    });

    let breakdown = summary_stats.render("summary statistics", |stats, _, _| {
        html! { <Breakdown stats={stats.clone()} /> }
    });

    html! {
        <div class="space-y-8">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-semibold">{"Dashboard"}</h1>
                <button
                    onclick={open_selection}
                    class="px-4 py-2 rounded-md text-sm font-medium text-white bg-blue-600 hover:bg-blue-700"
                >
                    {"Generate Summary"}
                </button>
            </div>
            {counts}
            {breakdown}
            {match &*dialog {
                Dialog::Closed => html! {},
                Dialog::SelectDocument => html! {
                    <DocumentSelectionModal
                        on_close={close_dialog.clone()}
                        on_select={on_document_selected}
                    />
                },
                Dialog::Summarize(document) => html! {
                    <SummaryModal
                        document={document.clone()}
                        on_close={close_dialog.clone()}
                        {on_generated}
                    />
                },
            }}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    label: AttrValue,
    value: AttrValue,
}

#[function_component]
fn StatCard(props: &StatCardProps) -> Html {
    html! {
        <div class="border border-neutral-200 dark:border-neutral-700 rounded-lg p-6">
            <p class="text-sm text-neutral-500">{&props.label}</p>
            <p class="text-3xl font-semibold mt-2">{&props.value}</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct BreakdownProps {
    stats: SummaryStats,
}

#[function_component]
fn Breakdown(props: &BreakdownProps) -> Html {
    let stats = &props.stats;
    let rows = [
        ("English", stats.by_language.english),
        ("Indonesian", stats.by_language.indonesian),
        ("Short", stats.by_style.short),
        ("General", stats.by_style.general),
        ("Detailed", stats.by_style.detailed),
    ];

    html! {
        <div class="border border-neutral-200 dark:border-neutral-700 rounded-lg p-6">
            <h2 class="text-lg font-medium mb-4">{"Summaries"}</h2>
            <dl class="grid grid-cols-2 sm:grid-cols-3 gap-4">
                {for rows.iter().map(|(label, count)| html! {
                    <div>
                        <dt class="text-sm text-neutral-500">{*label}</dt>
                        <dd class="text-xl font-medium">{count.to_string()}</dd>
                    </div>
                })}
                <div>
                    <dt class="text-sm text-neutral-500">{"Average processing time"}</dt>
                    <dd class="text-xl font-medium">
                        {format!("{:.1}s", stats.average_processing_time)}
                    </dd>
                </div>
            </dl>
        </div>
    }
}

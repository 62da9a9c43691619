use std::time::Duration;

use client_state::{BasicStats, fetch_basic_counts, fetch_detailed_stats, refresh_every};
use futures::future::abortable;
use payloads::responses::SummaryStats;
use yew::prelude::*;

use super::{FetchHookReturn, use_api_client, use_fetch};
use crate::timer::GlooTimer;

/// Document and summary totals. With `auto_refresh`, the counts are
/// refetched on that interval for as long as the component is mounted.
#[hook]
pub fn use_stats(auto_refresh: Option<Duration>) -> FetchHookReturn<BasicStats> {
    let client = use_api_client();
    let stats = use_fetch((), move || {
        let client = client.clone();
        async move { fetch_basic_counts(&client).await }
    });

    {
        let refetch = stats.refetch.clone();
        use_effect_with(auto_refresh, move |interval| {
            let handle = interval.map(|interval| {
                let (refresh, handle) = abortable(refresh_every(
                    GlooTimer,
                    interval,
                    move || {
                        refetch.emit(());
                        async {}
                    },
                ));
                yew::platform::spawn_local(async move {
                    let _ = refresh.await;
                });
                handle
            });
            move || {
                if let Some(handle) = handle {
                    tracing::debug!("stopping stats auto-refresh");
                    handle.abort();
                }
            }
        });
    }

    stats
}

/// Summary breakdown by language and style, degrading to the plain count
/// when the breakdown is unavailable.
#[hook]
pub fn use_summary_stats() -> FetchHookReturn<SummaryStats> {
    let client = use_api_client();
    use_fetch((), move || {
        let client = client.clone();
        async move { fetch_detailed_stats(&client).await }
    })
}

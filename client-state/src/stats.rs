use std::future::Future;
use std::time::Duration;

use payloads::{APIClient, responses::SummaryStats};

use crate::timer::Timer;

/// Default period for auto-refreshing dashboard counts.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Document and summary totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicStats {
    pub total_documents: u64,
    pub total_summaries: u64,
}

/// Backend endpoints the stats hooks aggregate.
pub trait StatsSource {
    fn count_documents(&self) -> impl Future<Output = Result<u64, String>>;
    fn count_summaries(&self) -> impl Future<Output = Result<u64, String>>;
    fn summary_breakdown(
        &self,
    ) -> impl Future<Output = Result<SummaryStats, String>>;
}

impl StatsSource for APIClient {
    async fn count_documents(&self) -> Result<u64, String> {
        self.document_count()
            .await
            .map(|c| c.count)
            .map_err(|e| e.to_string())
    }

    async fn count_summaries(&self) -> Result<u64, String> {
        self.summary_count()
            .await
            .map(|c| c.count)
            .map_err(|e| e.to_string())
    }

    async fn summary_breakdown(&self) -> Result<SummaryStats, String> {
        self.summary_stats().await.map_err(|e| e.to_string())
    }
}

/// Both counts, requested concurrently. If either request fails the whole
/// result is an error; partial counts are never returned.
pub async fn fetch_basic_counts<S: StatsSource>(
    source: &S,
) -> Result<BasicStats, String> {
    let (total_documents, total_summaries) =
        futures::try_join!(source.count_documents(), source.count_summaries())?;
    Ok(BasicStats {
        total_documents,
        total_summaries,
    })
}

/// The aggregate breakdown, degrading to the plain summary count (with
/// every breakdown zeroed) when the stats endpoint fails. Only the
/// fallback's error is surfaced.
pub async fn fetch_detailed_stats<S: StatsSource>(
    source: &S,
) -> Result<SummaryStats, String> {
    match source.summary_breakdown().await {
        Ok(stats) => Ok(stats),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "summary stats unavailable, falling back to count"
            );
            source.count_summaries().await.map(SummaryStats::from_count)
        }
    }
}

/// Call `refresh` every `interval`, forever. Dropping (or aborting) the
/// returned future stops the loop.
pub async fn refresh_every<Tm, F, Fut>(timer: Tm, interval: Duration, refresh: F)
where
    Tm: Timer,
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        timer.sleep(interval).await;
        tracing::debug!(?interval, "auto-refresh tick");
        refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TokioTimer;
    use payloads::responses::LanguageBreakdown;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeSource {
        documents: Option<u64>,
        summaries: Option<u64>,
        stats: Option<SummaryStats>,
        summary_calls: Cell<u32>,
    }

    fn outcome<T: Clone>(value: &Option<T>, what: &str) -> Result<T, String> {
        value.clone().ok_or_else(|| format!("Failed to fetch {what}"))
    }

    impl StatsSource for FakeSource {
        async fn count_documents(&self) -> Result<u64, String> {
            outcome(&self.documents, "document count")
        }

        async fn count_summaries(&self) -> Result<u64, String> {
            self.summary_calls.set(self.summary_calls.get() + 1);
            outcome(&self.summaries, "summary count")
        }

        async fn summary_breakdown(&self) -> Result<SummaryStats, String> {
            outcome(&self.stats, "summary stats")
        }
    }

    #[tokio::test]
    async fn basic_counts_combine_both_requests() {
        let source = FakeSource {
            documents: Some(4),
            summaries: Some(9),
            ..Default::default()
        };
        assert_eq!(
            fetch_basic_counts(&source).await,
            Ok(BasicStats {
                total_documents: 4,
                total_summaries: 9
            })
        );
    }

    #[tokio::test]
    async fn basic_counts_fail_as_a_unit() {
        let source = FakeSource {
            documents: None,
            summaries: Some(9),
            ..Default::default()
        };
        let error = fetch_basic_counts(&source).await.unwrap_err();
        assert_eq!(error, "Failed to fetch document count");
    }

    #[tokio::test]
    async fn detailed_stats_prefer_primary_endpoint() {
        let stats = SummaryStats {
            total_summaries: 3,
            by_language: LanguageBreakdown {
                english: 2,
                indonesian: 1,
            },
            ..Default::default()
        };
        let source = FakeSource {
            summaries: Some(99),
            stats: Some(stats.clone()),
            ..Default::default()
        };
        assert_eq!(fetch_detailed_stats(&source).await, Ok(stats));
        assert_eq!(source.summary_calls.get(), 0);
    }

    #[tokio::test]
    async fn detailed_stats_fall_back_to_count() {
        let source = FakeSource {
            summaries: Some(7),
            ..Default::default()
        };
        let stats = fetch_detailed_stats(&source).await.unwrap();
        assert_eq!(stats.total_summaries, 7);
        assert_eq!(
            stats.by_language,
            LanguageBreakdown {
                english: 0,
                indonesian: 0
            }
        );
        assert_eq!(stats.by_style.short + stats.by_style.detailed, 0);
        assert_eq!(stats.average_processing_time, 0.0);
    }

    #[tokio::test]
    async fn detailed_stats_surface_fallback_error() {
        let source = FakeSource::default();
        assert_eq!(
            fetch_detailed_stats(&source).await,
            Err("Failed to fetch summary count".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_stops_when_aborted() {
        let ticks = Rc::new(Cell::new(0));
        let local = tokio::task::LocalSet::new();

        local
            .run_until(async {
                let counter = ticks.clone();
                let (refresh, handle) =
                    futures::future::abortable(refresh_every(
                        TokioTimer,
                        DEFAULT_REFRESH_INTERVAL,
                        move || {
                            counter.set(counter.get() + 1);
                            async {}
                        },
                    ));
                tokio::task::spawn_local(refresh);

                tokio::time::sleep(Duration::from_secs(95)).await;
                assert_eq!(ticks.get(), 3);

                handle.abort();
                tokio::time::sleep(Duration::from_secs(120)).await;
                assert_eq!(ticks.get(), 3);
            })
            .await;
    }
}

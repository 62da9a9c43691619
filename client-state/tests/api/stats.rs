use client_state::{BasicStats, Fetcher, fetch_basic_counts, fetch_detailed_stats};
use payloads::requests::GenerateSummary;
use payloads::{SummaryLanguage, SummaryStyle};
use test_helpers::{Faults, spawn_app};

#[tokio::test]
async fn basic_counts_from_backend() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let documents = app.seed_documents(&["Lease", "Invoice"]).await?;
    app.create_summary(&documents[0], GenerateSummary::default())
        .await?;

    let stats = fetch_basic_counts(&app.client)
        .await
        .map_err(anyhow::Error::msg)?;
    assert_eq!(
        stats,
        BasicStats {
            total_documents: 2,
            total_summaries: 1
        }
    );

    Ok(())
}

#[tokio::test]
async fn one_failed_count_fails_both() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_documents(&["Lease"]).await?;
    app.set_faults(Faults {
        summary_count: true,
        ..Default::default()
    });

    let fetcher = Fetcher::<BasicStats>::default();
    let client = app.client.clone();
    let result = fetcher
        .run(async move { fetch_basic_counts(&client).await })
        .await;

    assert!(result.is_err());
    let resource = fetcher.snapshot();
    assert!(resource.data().is_none());
    assert!(resource.error.is_some_and(|e| !e.is_empty()));

    Ok(())
}

#[tokio::test]
async fn detailed_stats_breakdown() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let documents = app.seed_documents(&["Lease"]).await?;
    for (style, language) in [
        (SummaryStyle::Short, SummaryLanguage::English),
        (SummaryStyle::Detailed, SummaryLanguage::Indonesian),
    ] {
        app.create_summary(&documents[0], GenerateSummary { style, language })
            .await?;
    }

    let stats = fetch_detailed_stats(&app.client)
        .await
        .map_err(anyhow::Error::msg)?;
    assert_eq!(stats.total_summaries, 2);
    assert_eq!(stats.by_language.english, 1);
    assert_eq!(stats.by_language.indonesian, 1);
    assert_eq!(stats.by_style.short, 1);
    assert_eq!(stats.by_style.detailed, 1);

    Ok(())
}

#[tokio::test]
async fn detailed_stats_degrade_to_count() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let documents = app.seed_documents(&["Lease"]).await?;
    app.create_summary(&documents[0], GenerateSummary::default())
        .await?;
    app.set_faults(Faults {
        summary_stats: true,
        ..Default::default()
    });

    let stats = fetch_detailed_stats(&app.client)
        .await
        .map_err(anyhow::Error::msg)?;
    assert_eq!(stats.total_summaries, 1);
    assert_eq!(stats.by_language.english, 0);
    assert_eq!(stats.by_style.general, 0);
    assert_eq!(stats.average_processing_time, 0.0);

    Ok(())
}

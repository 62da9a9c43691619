use reqwest::StatusCode;

use payloads::{SummaryLanguage, SummaryStyle, requests};

use test_helpers::{Faults, assert_status_code, spawn_app};

#[tokio::test]
async fn generated_summary_is_attached_to_document() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let documents = app.seed_documents(&["Research paper"]).await?;
    let details = requests::GenerateSummary {
        style: SummaryStyle::Detailed,
        language: SummaryLanguage::Indonesian,
    };

    let summary = app
        .client
        .generate_summary(&documents[0].id, &details)
        .await?;
    assert_eq!(summary.style, SummaryStyle::Detailed);
    assert_eq!(summary.language, SummaryLanguage::Indonesian);
    assert_eq!(summary.pdf_id, documents[0].id);

    let detail = app.client.get_document(&documents[0].id).await?;
    assert_eq!(detail.summaries, vec![summary.clone()]);

    let fetched = app.client.get_summary(&summary.id).await?;
    assert_eq!(fetched, summary);

    Ok(())
}

#[tokio::test]
async fn summary_stats_break_down_by_language_and_style() -> anyhow::Result<()>
{
    let app = spawn_app().await;
    let documents = app.seed_documents(&["A", "B"]).await?;
    for document in &documents {
        app.create_summary(document, requests::GenerateSummary::default())
            .await?;
    }
    app.create_summary(
        &documents[0],
        requests::GenerateSummary {
            style: SummaryStyle::Short,
            language: SummaryLanguage::Indonesian,
        },
    )
    .await?;

    let stats = app.client.summary_stats().await?;
    assert_eq!(stats.total_summaries, 3);
    assert_eq!(stats.by_language.english, 2);
    assert_eq!(stats.by_language.indonesian, 1);
    assert_eq!(stats.by_style.general, 2);
    assert_eq!(stats.by_style.short, 1);
    assert_eq!(app.client.summary_count().await?.count, 3);

    Ok(())
}

#[tokio::test]
async fn injected_stats_fault_is_a_server_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.set_faults(Faults {
        summary_stats: true,
        ..Default::default()
    });

    let result = app.client.summary_stats().await;
    assert_status_code(result, StatusCode::INTERNAL_SERVER_ERROR);
    // the count endpoint is unaffected
    assert_eq!(app.client.summary_count().await?.count, 0);

    Ok(())
}

#[tokio::test]
async fn delete_summary() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let documents = app.seed_documents(&["Memo"]).await?;
    let summary = app
        .create_summary(&documents[0], requests::GenerateSummary::default())
        .await?;

    app.client.delete_summary(&summary.id).await?;
    let result = app.client.get_summary(&summary.id).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    let page = app
        .client
        .list_summaries(&requests::PaginationParams::default())
        .await?;
    assert!(page.is_empty());

    Ok(())
}

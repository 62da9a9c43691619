mod stats;
mod upload;

use client_state::{PaginatedFetcher, ParamsPatch, SettlePolicy};
use payloads::requests::PaginationParams;
use payloads::responses::DocumentPage;
use test_helpers::{TestApp, spawn_app};

fn document_list(
    app: &TestApp,
    policy: SettlePolicy,
) -> PaginatedFetcher<PaginationParams, DocumentPage> {
    let client = app.client.clone();
    PaginatedFetcher::new(
        PaginationParams::new(1, 50),
        policy,
        move |params: PaginationParams| {
            let client = client.clone();
            async move {
                client
                    .list_documents(&params)
                    .await
                    .map_err(|e| e.to_string())
            }
        },
    )
}

#[tokio::test]
async fn search_narrows_document_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_documents(&["Quarterly report", "Lease agreement", "Invoice"])
        .await?;
    let documents = document_list(&app, SettlePolicy::ArrivalOrder);

    let page = documents.fetch().await.map_err(anyhow::Error::msg)?;
    assert_eq!(page.data.len(), 3);

    let call = documents
        .update_params(&ParamsPatch::search("report"))
        .expect("search changed");
    call.await.map_err(anyhow::Error::msg)?;

    let resource = documents.resource();
    assert!(!resource.is_loading);
    assert_eq!(resource.error, None);
    let page = resource.data().expect("fetched");
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].title, "Quarterly report");
    assert_eq!(documents.params().search, "report");
    assert_eq!(documents.issued(), 2);

    Ok(())
}

#[tokio::test]
async fn paging_through_documents() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_documents(&["One", "Two", "Three"]).await?;
    let documents = document_list(&app, SettlePolicy::LatestIssued);

    let call = documents
        .update_params(&ParamsPatch::page(2).with_items_per_page(2))
        .expect("page changed");
    let page = call.await.map_err(anyhow::Error::msg)?;
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.data.len(), 1);
    assert!(page.has_previous());

    Ok(())
}

#[tokio::test]
async fn missing_document_error_is_surfaced() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let fetcher = client_state::Fetcher::default();
    let client = app.client.clone();

    let result = fetcher
        .run(async move {
            client
                .get_document(&payloads::DocumentId(404))
                .await
                .map_err(|e| e.to_string())
        })
        .await;

    assert_eq!(result, Err("PDF not found".to_string()));
    let resource = fetcher.snapshot();
    assert!(!resource.data.is_fetched());
    assert_eq!(resource.error.as_deref(), Some("PDF not found"));

    Ok(())
}

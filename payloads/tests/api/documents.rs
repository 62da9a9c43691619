use reqwest::StatusCode;

use payloads::{DocumentId, requests};

use test_helpers::{assert_status_code, fake_pdf, spawn_app};

#[tokio::test]
async fn list_documents_paginates_and_searches() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.seed_documents(&["Annual report", "Meeting notes", "Budget report"])
        .await?;

    let page = app
        .client
        .list_documents(&requests::PaginationParams::new(1, 2))
        .await?;
    assert_eq!(page.total_items, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.len(), 2);
    assert!(page.has_next());

    let page = app
        .client
        .list_documents(
            &requests::PaginationParams::new(1, 50).with_search("report"),
        )
        .await?;
    assert_eq!(page.total_items, 2);
    assert!(page.data.iter().all(|d| d.title.contains("report")));

    Ok(())
}

#[tokio::test]
async fn uploaded_document_has_metadata() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bytes = fake_pdf(4);
    let size = bytes.len() as u64;

    let document = app.upload_pdf("contract.pdf", None, bytes).await?;
    assert_eq!(document.title, "contract");
    assert_eq!(document.page_count, 4);
    assert_eq!(document.file_size, size);

    let detail = app.client.get_document(&document.id).await?;
    assert_eq!(detail.document(), document);
    assert!(detail.summaries.is_empty());

    Ok(())
}

#[tokio::test]
async fn non_pdf_upload_is_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let result = app.upload_pdf("notes.txt", None, b"hello".to_vec()).await;
    let message = result.unwrap_err().to_string();
    assert_eq!(message, "Only PDF files are allowed");
    Ok(())
}

#[tokio::test]
async fn download_carries_suggested_filename() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let bytes = fake_pdf(1);
    let document = app
        .upload_pdf("scan.pdf", Some("Signed lease"), bytes.clone())
        .await?;

    let file = app.client.download_document(&document.id).await?;
    assert_eq!(file.filename.as_deref(), Some("Signed lease.pdf"));
    assert_eq!(file.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(file.bytes, bytes);

    Ok(())
}

#[tokio::test]
async fn delete_document_then_missing() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let documents = app.seed_documents(&["Draft"]).await?;
    let id = documents[0].id;

    let message = app.client.delete_document(&id).await?;
    assert_eq!(message.message, "PDF deleted successfully");

    let result = app.client.get_document(&id).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn missing_document_error_uses_server_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let error = app
        .client
        .get_document(&DocumentId(999))
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(error.to_string(), "PDF not found");
    Ok(())
}

#[tokio::test]
async fn document_count_tracks_uploads() -> anyhow::Result<()> {
    let app = spawn_app().await;
    assert_eq!(app.client.document_count().await?.count, 0);
    app.seed_documents(&["One", "Two"]).await?;
    assert_eq!(app.client.document_count().await?.count, 2);
    Ok(())
}

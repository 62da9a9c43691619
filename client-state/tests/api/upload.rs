use client_state::{
    ReqwestTransport, TransportEvent, UploadForm, UploadTransport, Uploader,
};
use futures::StreamExt;
use test_helpers::{fake_pdf, spawn_app};

#[tokio::test]
async fn streamed_upload_reports_progress() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let transport =
        ReqwestTransport::new(app.client.inner_client.clone()).with_chunk_size(64);
    let uploader = Uploader::new();
    let bytes = fake_pdf(3);
    let size = bytes.len() as u64;

    let mut seen = Vec::new();
    let document = uploader
        .upload(
            &transport,
            &app.client.upload_url(),
            UploadForm::pdf("lease.pdf", bytes).with_title("Lease"),
        )
        .finish(|percent| seen.push(percent))
        .await
        .map_err(anyhow::Error::msg)?;

    assert_eq!(document.title, "Lease");
    assert_eq!(document.file_size, size);
    assert_eq!(document.page_count, 3);
    assert!(seen.len() > 1);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&100.0));

    let state = uploader.state();
    assert!(!state.uploading);
    assert_eq!(state.progress, 0.0);
    assert_eq!(state.error, None);

    Ok(())
}

#[tokio::test]
async fn backend_rejection_carries_its_message() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let transport = ReqwestTransport::new(app.client.inner_client.clone());

    let mut events = transport.send(
        &app.client.upload_url(),
        UploadForm::pdf("notes.txt", b"plain text".to_vec()),
    );
    let mut response = None;
    while let Some(event) = events.next().await {
        if let TransportEvent::Response { status, body } = event {
            response = Some((status, body));
            break;
        }
    }

    let (status, body) = response.expect("backend responded");
    assert_eq!(status, 400);
    assert!(body.contains("Only PDF files are allowed"));

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    let uploader = Uploader::new();
    let result = uploader
        .upload(
            &ReqwestTransport::default(),
            "http://127.0.0.1:9/pdf/upload",
            UploadForm::pdf("lease.pdf", fake_pdf(1)),
        )
        .finish(|_| {})
        .await;

    assert_eq!(result, Err("Upload failed: network error".to_string()));
    assert_eq!(
        uploader.state().error.as_deref(),
        Some("Upload failed: network error")
    );

    Ok(())
}

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::stream::{LocalBoxStream, Stream, StreamExt};
use payloads::{MAX_UPLOAD_SIZE, responses};

use crate::Listener;

const NETWORK_ERROR: &str = "Upload failed: network error";
const GENERIC_ERROR: &str = "Upload failed";

/// Reasons a file is refused before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Only PDF files are allowed")]
    NotPdf,
    #[error("File is empty")]
    Empty,
    #[error("File size exceeds the {} MB limit", MAX_UPLOAD_SIZE / (1024 * 1024))]
    TooLarge,
}

/// A file plus the optional title, sent as a multipart body with a `file`
/// field and, when set, a `title` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub content_type: String,
}

impl UploadForm {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            title: None,
            content_type: "application/pdf".to_string(),
        }
    }

    /// Set the title. Blank titles are dropped so the backend falls back to
    /// the file name.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        let title = title.trim();
        self.title = (!title.is_empty()).then(|| title.to_string());
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.file_name.to_lowercase().ends_with(".pdf") {
            return Err(ValidationError::NotPdf);
        }
        match self.size() {
            0 => Err(ValidationError::Empty),
            n if n > MAX_UPLOAD_SIZE => Err(ValidationError::TooLarge),
            _ => Ok(()),
        }
    }
}

/// Raw signals from whatever is carrying the request.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Progress { loaded: u64, total: Option<u64> },
    Response { status: u16, body: String },
    NetworkError(String),
}

/// Sends multipart uploads and reports their progress.
pub trait UploadTransport {
    fn send(
        &self,
        url: &str,
        form: UploadForm,
    ) -> LocalBoxStream<'static, TransportEvent>;
}

/// What an [`UploadSession`] yields: any number of progress percentages,
/// then exactly one outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Progress(f64),
    Finished(Result<responses::Document, String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    pub uploading: bool,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub error: Option<String>,
}

#[derive(Default)]
struct Inner {
    state: RefCell<UploadState>,
    listener: RefCell<Option<Listener>>,
}

impl Inner {
    fn update(&self, f: impl FnOnce(&mut UploadState)) {
        f(&mut self.state.borrow_mut());
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

/// Upload state for one hook instance. Overlapping uploads share the same
/// state and are not guarded against.
#[derive(Clone, Default)]
pub struct Uploader {
    inner: Rc<Inner>,
}

impl PartialEq for Uploader {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Uploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&self, listener: Listener) {
        *self.inner.listener.borrow_mut() = Some(listener);
    }

    pub fn state(&self) -> UploadState {
        self.inner.state.borrow().clone()
    }

    /// Validate `form` and start sending it to `url`.
    pub fn upload<T: UploadTransport + ?Sized>(
        &self,
        transport: &T,
        url: &str,
        form: UploadForm,
    ) -> UploadSession {
        self.inner.update(|state| {
            state.uploading = true;
            state.progress = 0.0;
            state.error = None;
        });
        let (events, rejected) = match form.validate() {
            Ok(()) => {
                tracing::debug!(file = %form.file_name, size = form.size(), "upload started");
                (transport.send(url, form), None)
            }
            Err(e) => {
                tracing::warn!(file = %form.file_name, error = %e, "upload rejected");
                (
                    futures::stream::empty::<TransportEvent>().boxed_local(),
                    Some(e.to_string()),
                )
            }
        };
        UploadSession {
            inner: self.inner.clone(),
            events,
            rejected,
            done: false,
        }
    }
}

/// An upload in progress. Drive it as a [`Stream`] of [`UploadEvent`]s, or
/// with [`finish`](Self::finish). Dropping an unfinished session resets the
/// state.
pub struct UploadSession {
    inner: Rc<Inner>,
    events: LocalBoxStream<'static, TransportEvent>,
    rejected: Option<String>,
    done: bool,
}

impl UploadSession {
    /// Drive the upload to completion, calling `on_progress` with each
    /// percentage.
    pub async fn finish(
        mut self,
        mut on_progress: impl FnMut(f64),
    ) -> Result<responses::Document, String> {
        while let Some(event) = self.next().await {
            match event {
                UploadEvent::Progress(percent) => on_progress(percent),
                UploadEvent::Finished(result) => return result,
            }
        }
        Err(NETWORK_ERROR.to_string())
    }

    fn complete(
        &mut self,
        result: Result<responses::Document, String>,
    ) -> Poll<Option<UploadEvent>> {
        self.done = true;
        match &result {
            Ok(document) => {
                tracing::info!(id = %document.id, "upload finished")
            }
            Err(e) => tracing::warn!(error = %e, "upload failed"),
        }
        let error = result.as_ref().err().cloned();
        self.inner.update(|state| {
            state.uploading = false;
            state.progress = 0.0;
            state.error = error;
        });
        Poll::Ready(Some(UploadEvent::Finished(result)))
    }
}

impl Stream for UploadSession {
    type Item = UploadEvent;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<UploadEvent>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if let Some(message) = this.rejected.take() {
            return this.complete(Err(message));
        }
        loop {
            match this.events.poll_next_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(TransportEvent::Progress { loaded, total })) => {
                    let Some(percent) = percent(loaded, total) else {
                        continue;
                    };
                    this.inner.update(|state| state.progress = percent);
                    return Poll::Ready(Some(UploadEvent::Progress(percent)));
                }
                Poll::Ready(Some(TransportEvent::Response { status, body })) => {
                    return this.complete(interpret_response(status, &body));
                }
                Poll::Ready(Some(TransportEvent::NetworkError(e))) => {
                    tracing::debug!(error = %e, "transport error");
                    return this.complete(Err(NETWORK_ERROR.to_string()));
                }
                Poll::Ready(None) => {
                    return this.complete(Err(NETWORK_ERROR.to_string()));
                }
            }
        }
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        if !self.done {
            self.inner.update(|state| {
                state.uploading = false;
                state.progress = 0.0;
            });
        }
    }
}

fn percent(loaded: u64, total: Option<u64>) -> Option<f64> {
    let total = total.filter(|t| *t > 0)?;
    Some((loaded as f64 / total as f64 * 100.0).min(100.0))
}

fn interpret_response(
    status: u16,
    body: &str,
) -> Result<responses::Document, String> {
    match status {
        200 | 201 => serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, "unreadable upload response");
            GENERIC_ERROR.to_string()
        }),
        _ => Err(serde_json::from_str::<responses::Message>(body)
            .ok()
            .map(|m| m.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_ERROR.to_string())),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use futures::channel::mpsc;
    use futures::future::{self, FutureExt};
    use futures::stream;
    use reqwest::multipart::{Form, Part};

    const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

    /// Streams the file in chunks, reporting progress as reqwest pulls each
    /// one.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
        chunk_size: usize,
    }

    impl Default for ReqwestTransport {
        fn default() -> Self {
            Self::new(reqwest::Client::new())
        }
    }

    impl ReqwestTransport {
        pub fn new(client: reqwest::Client) -> Self {
            Self {
                client,
                chunk_size: DEFAULT_CHUNK_SIZE,
            }
        }

        pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
            self.chunk_size = chunk_size.max(1);
            self
        }

        fn form(
            &self,
            form: UploadForm,
            progress: mpsc::UnboundedSender<TransportEvent>,
        ) -> reqwest::Result<Form> {
            let total = form.size();
            let chunks: Vec<Vec<u8>> = form
                .bytes
                .chunks(self.chunk_size)
                .map(<[u8]>::to_vec)
                .collect();
            let mut loaded = 0;
            let body = stream::iter(chunks).map(move |chunk| {
                loaded += chunk.len() as u64;
                let _ = progress.unbounded_send(TransportEvent::Progress {
                    loaded,
                    total: Some(total),
                });
                Ok::<_, std::io::Error>(chunk)
            });
            let part =
                Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
                    .file_name(form.file_name)
                    .mime_str(&form.content_type)?;
            let mut multipart = Form::new().part("file", part);
            if let Some(title) = form.title {
                multipart = multipart.text("title", title);
            }
            Ok(multipart)
        }
    }

    impl UploadTransport for ReqwestTransport {
        fn send(
            &self,
            url: &str,
            form: UploadForm,
        ) -> LocalBoxStream<'static, TransportEvent> {
            let (tx, rx) = mpsc::unbounded();
            let multipart = match self.form(form, tx.clone()) {
                Ok(multipart) => multipart,
                Err(e) => {
                    return stream::once(future::ready(
                        TransportEvent::NetworkError(e.to_string()),
                    ))
                    .boxed_local();
                }
            };
            let request = self.client.post(url).multipart(multipart).send();
            let outcome = async move {
                let event = match request.await {
                    Ok(response) => {
                        let status = response.status().as_u16();
                        let body = response.text().await.unwrap_or_default();
                        TransportEvent::Response { status, body }
                    }
                    Err(e) => TransportEvent::NetworkError(e.to_string()),
                };
                let _ = tx.unbounded_send(event);
            };
            stream::select(
                rx,
                outcome.into_stream().filter_map(|()| future::ready(None::<TransportEvent>)),
            )
            .boxed_local()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use payloads::DocumentId;

    struct Scripted(Vec<TransportEvent>);

    impl UploadTransport for Scripted {
        fn send(
            &self,
            _url: &str,
            _form: UploadForm,
        ) -> LocalBoxStream<'static, TransportEvent> {
            stream::iter(self.0.clone()).boxed_local()
        }
    }

    fn form() -> UploadForm {
        UploadForm::pdf("report.pdf", vec![1; 200]).with_title("Report")
    }

    fn document_json() -> String {
        let now = jiff::Timestamp::UNIX_EPOCH;
        serde_json::to_string(&responses::Document {
            id: DocumentId(7),
            filename: "a1b2.pdf".into(),
            file_size: 200,
            title: "Report".into(),
            page_count: 2,
            created_at: now,
            updated_at: now,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn progress_is_reported_then_reset_on_success() {
        let uploader = Uploader::new();
        let transport = Scripted(vec![
            TransportEvent::Progress {
                loaded: 50,
                total: Some(200),
            },
            TransportEvent::Response {
                status: 201,
                body: document_json(),
            },
        ]);
        let mut session = uploader.upload(&transport, "/pdf/upload", form());
        assert!(uploader.state().uploading);

        assert_eq!(session.next().await, Some(UploadEvent::Progress(25.0)));
        assert_eq!(uploader.state().progress, 25.0);

        let Some(UploadEvent::Finished(Ok(document))) = session.next().await else {
            panic!("expected a successful upload");
        };
        assert_eq!(document.id, DocumentId(7));
        assert_eq!(session.next().await, None);
        assert_eq!(uploader.state(), UploadState::default());
    }

    #[tokio::test]
    async fn unknown_total_reports_no_progress() {
        let uploader = Uploader::new();
        let transport = Scripted(vec![
            TransportEvent::Progress {
                loaded: 50,
                total: None,
            },
            TransportEvent::Progress {
                loaded: 50,
                total: Some(0),
            },
            TransportEvent::Response {
                status: 200,
                body: document_json(),
            },
        ]);
        let mut seen = Vec::new();
        let result = uploader
            .upload(&transport, "/pdf/upload", form())
            .finish(|p| seen.push(p))
            .await;
        assert!(result.is_ok());
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn network_failure_sets_error_and_resets_progress() {
        let uploader = Uploader::new();
        let transport = Scripted(vec![
            TransportEvent::Progress {
                loaded: 150,
                total: Some(200),
            },
            TransportEvent::NetworkError("connection reset".into()),
        ]);
        let result = uploader
            .upload(&transport, "/pdf/upload", form())
            .finish(|_| {})
            .await;
        assert_eq!(result, Err(NETWORK_ERROR.to_string()));

        let state = uploader.state();
        assert!(!state.uploading);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.error.as_deref(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn server_message_is_preferred() {
        let uploader = Uploader::new();
        let transport = Scripted(vec![TransportEvent::Response {
            status: 400,
            body: r#"{"message":"Only PDF files are allowed"}"#.into(),
        }]);
        let result = uploader
            .upload(&transport, "/pdf/upload", form())
            .finish(|_| {})
            .await;
        assert_eq!(result, Err("Only PDF files are allowed".to_string()));
    }

    #[tokio::test]
    async fn server_error_without_message_is_generic() {
        let uploader = Uploader::new();
        let transport = Scripted(vec![TransportEvent::Response {
            status: 502,
            body: "<html>Bad Gateway</html>".into(),
        }]);
        let result = uploader
            .upload(&transport, "/pdf/upload", form())
            .finish(|_| {})
            .await;
        assert_eq!(result, Err(GENERIC_ERROR.to_string()));
    }

    #[tokio::test]
    async fn invalid_file_never_reaches_transport() {
        struct Unreachable;
        impl UploadTransport for Unreachable {
            fn send(
                &self,
                _url: &str,
                _form: UploadForm,
            ) -> LocalBoxStream<'static, TransportEvent> {
                panic!("transport should not be used");
            }
        }

        let uploader = Uploader::new();
        let result = uploader
            .upload(&Unreachable, "/pdf/upload", UploadForm::pdf("notes.txt", vec![1]))
            .finish(|_| {})
            .await;
        assert_eq!(result, Err("Only PDF files are allowed".to_string()));
        assert!(!uploader.state().uploading);
    }

    #[test]
    fn validation_rules() {
        assert_eq!(form().validate(), Ok(()));
        assert_eq!(
            UploadForm::pdf("SCAN.PDF", vec![1]).validate(),
            Ok(())
        );
        assert_eq!(
            UploadForm::pdf("empty.pdf", Vec::new()).validate(),
            Err(ValidationError::Empty)
        );
        assert_eq!(
            UploadForm::pdf("image.png", vec![1]).validate(),
            Err(ValidationError::NotPdf)
        );
    }

    #[test]
    fn blank_title_is_dropped() {
        let form = UploadForm::pdf("a.pdf", vec![1]).with_title("   ");
        assert_eq!(form.title, None);
        let form = UploadForm::pdf("a.pdf", vec![1]).with_title(" Lease ");
        assert_eq!(form.title.as_deref(), Some("Lease"));
    }

    #[test]
    fn dropped_session_resets_state() {
        let uploader = Uploader::new();
        let session = uploader.upload(&Scripted(Vec::new()), "/pdf/upload", form());
        assert!(uploader.state().uploading);
        drop(session);
        assert!(!uploader.state().uploading);
    }
}

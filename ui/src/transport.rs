//! Browser upload transport.
//!
//! `fetch` exposes no upload progress, so uploads go through
//! `XMLHttpRequest` and its `upload.onprogress` events.

use std::pin::Pin;
use std::task::{Context, Poll};

use client_state::{TransportEvent, UploadForm, UploadTransport};
use futures::channel::mpsc;
use futures::stream::{self, LocalBoxStream, Stream, StreamExt};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, FormData, ProgressEvent, XmlHttpRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct XhrTransport;

impl UploadTransport for XhrTransport {
    fn send(
        &self,
        url: &str,
        form: UploadForm,
    ) -> LocalBoxStream<'static, TransportEvent> {
        let (tx, rx) = mpsc::unbounded();
        match XhrRequest::start(url, &form, tx) {
            Ok(request) => XhrEvents {
                events: rx,
                _request: request,
            }
            .boxed_local(),
            Err(e) => {
                tracing::error!(error = ?e, "could not start upload request");
                stream::iter([TransportEvent::NetworkError(format!("{e:?}"))])
                    .boxed_local()
            }
        }
    }
}

/// A request in flight along with the callbacks it reports through. The
/// request is aborted if dropped before completion.
struct XhrRequest {
    xhr: XmlHttpRequest,
    _on_progress: Closure<dyn FnMut(ProgressEvent)>,
    _on_load: Closure<dyn FnMut()>,
    _on_error: Closure<dyn FnMut()>,
}

impl XhrRequest {
    fn start(
        url: &str,
        form: &UploadForm,
        tx: mpsc::UnboundedSender<TransportEvent>,
    ) -> Result<Self, JsValue> {
        let data = FormData::new()?;
        data.append_with_blob_and_filename("file", &to_blob(form)?, &form.file_name)?;
        if let Some(title) = &form.title {
            data.append_with_str("title", title)?;
        }

        let xhr = XmlHttpRequest::new()?;
        xhr.open_with_async("POST", url, true)?;

        let on_progress = {
            let tx = tx.clone();
            Closure::<dyn FnMut(ProgressEvent)>::new(move |e: ProgressEvent| {
                let total = e.length_computable().then(|| e.total() as u64);
                let _ = tx.unbounded_send(TransportEvent::Progress {
                    loaded: e.loaded() as u64,
                    total,
                });
            })
        };
        xhr.upload()?
            .set_onprogress(Some(on_progress.as_ref().unchecked_ref()));

        let on_load = {
            let tx = tx.clone();
            let xhr = xhr.clone();
            Closure::<dyn FnMut()>::new(move || {
                let status = xhr.status().unwrap_or_default();
                let body = xhr.response_text().ok().flatten().unwrap_or_default();
                let _ = tx.unbounded_send(TransportEvent::Response { status, body });
            })
        };
        xhr.set_onload(Some(on_load.as_ref().unchecked_ref()));

        let on_error = Closure::<dyn FnMut()>::new(move || {
            let _ = tx.unbounded_send(TransportEvent::NetworkError(
                "request failed".to_string(),
            ));
        });
        xhr.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&data))?;

        Ok(Self {
            xhr,
            _on_progress: on_progress,
            _on_load: on_load,
            _on_error: on_error,
        })
    }
}

impl Drop for XhrRequest {
    fn drop(&mut self) {
        if self.xhr.ready_state() != XmlHttpRequest::DONE {
            let _ = self.xhr.abort();
        }
    }
}

fn to_blob(form: &UploadForm) -> Result<Blob, JsValue> {
    let bytes = js_sys::Uint8Array::from(form.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(&form.content_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

struct XhrEvents {
    events: mpsc::UnboundedReceiver<TransportEvent>,
    _request: XhrRequest,
}

impl Stream for XhrEvents {
    type Item = TransportEvent;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<TransportEvent>> {
        self.events.poll_next_unpin(cx)
    }
}

/// Read a file picked in the browser into memory.
pub async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Could not read file: {e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

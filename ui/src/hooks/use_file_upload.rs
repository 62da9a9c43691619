use std::rc::Rc;

use client_state::{UploadForm, UploadSession, Uploader};
use yew::prelude::*;

use super::use_api_client;
use crate::transport::XhrTransport;

/// Upload state plus a way to start uploads.
#[derive(Clone, PartialEq)]
pub struct FileUploadHandle {
    pub uploading: bool,
    /// Percentage in `[0, 100]`
    pub progress: f64,
    pub error: Option<String>,
    uploader: Uploader,
    url: AttrValue,
}

impl FileUploadHandle {
    /// Start uploading `form`. The returned session resolves to the stored
    /// document or an error string; the same outcome is reflected in this
    /// hook's state.
    pub fn upload(&self, form: UploadForm) -> UploadSession {
        self.uploader.upload(&XhrTransport, &self.url, form)
    }
}

#[hook]
pub fn use_file_upload() -> FileUploadHandle {
    let client = use_api_client();
    let update = use_force_update();
    let uploader = use_memo((), move |_| {
        let uploader = Uploader::new();
        uploader.set_listener(Rc::new(move || update.force_update()));
        uploader
    });
    let url = use_memo((), move |_| AttrValue::from(client.upload_url()));

    let state = uploader.state();
    FileUploadHandle {
        uploading: state.uploading,
        progress: state.progress,
        error: state.error,
        uploader: (*uploader).clone(),
        url: (*url).clone(),
    }
}

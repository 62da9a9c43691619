use crate::{
    DocumentId, SummaryId, format::filename_from_content_disposition,
    requests, responses,
};
use reqwest::{StatusCode, header};
use serde::Serialize;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// Where the backend lives.
///
/// Passed explicitly to [`APIClient::new`]; the client never reads the
/// environment itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address without a trailing slash, e.g. `http://localhost:8080`.
    pub address: String,
}

impl ClientConfig {
    pub fn new(address: impl Into<String>) -> Self {
        let address: String = address.into();
        Self {
            address: address.trim_end_matches('/').to_string(),
        }
    }
}

/// An API client for interfacing with the document backend.
#[derive(Debug, Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

impl APIClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            address: config.address,
            inner_client: reqwest::Client::new(),
        }
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}/{path}", &self.address)
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        self.inner_client
            .post(self.format_url(path))
            .json(body)
            .send()
            .await
    }

    async fn empty_get(&self, path: &str) -> ReqwestResult {
        self.inner_client.get(self.format_url(path)).send().await
    }

    async fn query_get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ReqwestResult {
        self.inner_client
            .get(self.format_url(path))
            .query(query)
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        self.inner_client.delete(self.format_url(path)).send().await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.empty_get("ping").await?;
        ok_empty(response).await
    }

    /// List one page of documents, optionally filtered by title.
    pub async fn list_documents(
        &self,
        params: &requests::PaginationParams,
    ) -> Result<responses::DocumentPage, ClientError> {
        let response = self.query_get("pdf", &params.to_query()).await?;
        ok_body(response).await
    }

    /// Get a document including its summaries.
    pub async fn get_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<responses::DocumentDetail, ClientError> {
        let response = self.empty_get(&format!("pdf/{document_id}")).await?;
        ok_body(response).await
    }

    /// Delete a document along with its stored file and summaries.
    pub async fn delete_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<responses::Message, ClientError> {
        let response = self.delete(&format!("pdf/{document_id}")).await?;
        ok_body(response).await
    }

    /// Fetch the raw PDF bytes and the filename suggested by the backend.
    pub async fn download_document(
        &self,
        document_id: &DocumentId,
    ) -> Result<responses::DownloadedFile, ClientError> {
        let response = self
            .empty_get(&format!("pdf/{document_id}/download"))
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        let headers = response.headers();
        let filename = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_content_disposition);
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();
        Ok(responses::DownloadedFile {
            filename,
            content_type,
            bytes,
        })
    }

    /// Ask the backend to generate a new summary for a document.
    pub async fn generate_summary(
        &self,
        document_id: &DocumentId,
        details: &requests::GenerateSummary,
    ) -> Result<responses::Summary, ClientError> {
        let response = self
            .post(&format!("pdf/{document_id}/summarize"), details)
            .await?;
        ok_body(response).await
    }

    pub async fn document_count(
        &self,
    ) -> Result<responses::Count, ClientError> {
        let response = self.empty_get("pdf/count").await?;
        ok_body(response).await
    }

    pub async fn summary_count(&self) -> Result<responses::Count, ClientError> {
        let response = self.empty_get("summaries/count").await?;
        ok_body(response).await
    }

    /// Aggregate breakdown of all summaries by language and style.
    pub async fn summary_stats(
        &self,
    ) -> Result<responses::SummaryStats, ClientError> {
        let response = self.empty_get("summaries/stats").await?;
        ok_body(response).await
    }

    pub async fn list_summaries(
        &self,
        params: &requests::PaginationParams,
    ) -> Result<responses::SummaryPage, ClientError> {
        let response = self.query_get("summaries", &params.to_query()).await?;
        ok_body(response).await
    }

    pub async fn get_summary(
        &self,
        summary_id: &SummaryId,
    ) -> Result<responses::Summary, ClientError> {
        let response =
            self.empty_get(&format!("summaries/{summary_id}")).await?;
        ok_body(response).await
    }

    pub async fn delete_summary(
        &self,
        summary_id: &SummaryId,
    ) -> Result<responses::Message, ClientError> {
        let response = self.delete(&format!("summaries/{summary_id}")).await?;
        ok_body(response).await
    }

    /// Multipart upload endpoint. Uploads go through a progress-reporting
    /// transport rather than this client, so only the URL is exposed.
    pub fn upload_url(&self) -> String {
        self.format_url("pdf/upload")
    }

    /// URL of the raw PDF, usable as a link target.
    pub fn download_url(&self, document_id: &DocumentId) -> String {
        self.format_url(&format!("pdf/{document_id}/download"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the server's message
    /// (or the raw response text when it sent none).
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(_) => None,
        }
    }
}

/// Extract the `message` field from an error body, falling back to the raw
/// text, or to the status reason when the body is empty.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(responses::Message { message }) = serde_json::from_str(body)
        && !message.is_empty()
    {
        return message;
    }
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }
    body.to_string()
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    match response.text().await {
        Ok(body) => {
            tracing::debug!(%status, "backend returned an error");
            ClientError::APIError(status, error_message(status, &body))
        }
        Err(e) => e.into(),
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message(
                StatusCode::NOT_FOUND,
                r#"{"message":"PDF not found"}"#
            ),
            "PDF not found"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
    }

    #[test]
    fn config_trims_trailing_slash() {
        let client = APIClient::new(ClientConfig::new("http://localhost:8080/"));
        assert_eq!(client.upload_url(), "http://localhost:8080/pdf/upload");
        assert_eq!(
            client.download_url(&DocumentId(3)),
            "http://localhost:8080/pdf/3/download"
        );
    }
}

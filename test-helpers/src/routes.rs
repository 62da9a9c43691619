use actix_multipart::Multipart;
use actix_web::{
    HttpResponse, Responder, ResponseError, body::BoxBody, delete,
    dev::HttpServiceFactory, get, http::StatusCode, http::header, post, web,
};
use futures::StreamExt;
use payloads::{DocumentId, MAX_UPLOAD_SIZE, SummaryId, requests, responses};
use serde::Deserialize;

use crate::store::{Store, StoreError};

pub fn api_services() -> impl HttpServiceFactory {
    // fixed paths must be registered before the `{id}` routes they overlap
    web::scope("")
        .service(ping)
        .service(list_documents)
        .service(document_count)
        .service(upload_document)
        .service(get_document)
        .service(delete_document)
        .service(download_document)
        .service(generate_summary)
        .service(list_summaries)
        .service(summary_count)
        .service(summary_stats)
        .service(get_summary)
        .service(delete_summary)
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    UnexpectedError(String),
}

impl ResponseError for APIError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).json(responses::Message {
            message: self.to_string(),
        })
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DocumentNotFound | StoreError::SummaryNotFound => {
                APIError::NotFound(e.to_string())
            }
            StoreError::Injected(_) => APIError::UnexpectedError(e.to_string()),
        }
    }
}

/// Raw list query, using the backend's lowercase parameter names.
#[derive(Debug, Deserialize)]
struct ListQuery {
    page: Option<u32>,
    itemsperpage: Option<u32>,
    search: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

impl ListQuery {
    fn into_params(self) -> requests::PaginationParams {
        let mut params = requests::PaginationParams::new(
            self.page.unwrap_or(1),
            self.itemsperpage.unwrap_or(requests::DEFAULT_ITEMS_PER_PAGE),
        )
        .with_search(self.search.unwrap_or_default());
        if let Some(sort) = self.sort {
            params = params.with_filter("sort", sort);
        }
        if let Some(order) = self.order {
            params = params.with_filter("order", order);
        }
        params
    }
}

#[get("/ping")]
async fn ping() -> impl Responder {
    HttpResponse::Ok().json(responses::Message {
        message: "pong".to_string(),
    })
}

#[tracing::instrument(skip(store))]
#[get("/pdf")]
async fn list_documents(
    store: web::Data<Store>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, APIError> {
    let params = query.into_inner().into_params();
    Ok(HttpResponse::Ok().json(store.list_documents(&params)))
}

#[get("/pdf/count")]
async fn document_count(
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let count = store.document_count()?;
    Ok(HttpResponse::Ok().json(responses::Count { count }))
}

#[tracing::instrument(skip(store, payload))]
#[post("/pdf/upload")]
async fn upload_document(
    store: web::Data<Store>,
    mut payload: Multipart,
) -> Result<HttpResponse, APIError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut title: Option<String> = None;

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| APIError::BadRequest(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| APIError::BadRequest(e.to_string()))?;
            if (bytes.len() + chunk.len()) as u64 > MAX_UPLOAD_SIZE {
                return Err(APIError::BadRequest(format!(
                    "file size exceeds maximum limit of {MAX_UPLOAD_SIZE} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "file" => {
                file = Some((filename.unwrap_or_else(|| "upload.pdf".into()), bytes))
            }
            "title" => title = Some(String::from_utf8_lossy(&bytes).into_owned()),
            _ => {}
        }
    }

    let Some((filename, bytes)) = file else {
        return Err(APIError::BadRequest("File is required".to_string()));
    };
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(APIError::BadRequest(
            "Only PDF files are allowed".to_string(),
        ));
    }
    if bytes.is_empty() {
        return Err(APIError::BadRequest(
            "file size must be greater than 0".to_string(),
        ));
    }

    let document = store.insert_document(&filename, title.as_deref(), bytes);
    tracing::info!(id = %document.id, "stored uploaded document");
    Ok(HttpResponse::Created().json(document))
}

#[get("/pdf/{id}")]
async fn get_document(
    store: web::Data<Store>,
    id: web::Path<u64>,
) -> Result<HttpResponse, APIError> {
    let document = store.get_document(DocumentId(id.into_inner()))?;
    Ok(HttpResponse::Ok().json(document))
}

#[delete("/pdf/{id}")]
async fn delete_document(
    store: web::Data<Store>,
    id: web::Path<u64>,
) -> Result<HttpResponse, APIError> {
    store.delete_document(DocumentId(id.into_inner()))?;
    Ok(HttpResponse::Ok().json(responses::Message {
        message: "PDF deleted successfully".to_string(),
    }))
}

#[get("/pdf/{id}/download")]
async fn download_document(
    store: web::Data<Store>,
    id: web::Path<u64>,
) -> Result<HttpResponse, APIError> {
    let (filename, bytes) = store.document_file(DocumentId(id.into_inner()))?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes))
}

#[tracing::instrument(skip(store))]
#[post("/pdf/{id}/summarize")]
async fn generate_summary(
    store: web::Data<Store>,
    id: web::Path<u64>,
    details: web::Json<requests::GenerateSummary>,
) -> Result<HttpResponse, APIError> {
    let summary =
        store.generate_summary(DocumentId(id.into_inner()), &details)?;
    Ok(HttpResponse::Ok().json(summary))
}

#[get("/summaries")]
async fn list_summaries(
    store: web::Data<Store>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, APIError> {
    let params = query.into_inner().into_params();
    Ok(HttpResponse::Ok().json(store.list_summaries(&params)))
}

#[get("/summaries/count")]
async fn summary_count(
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    let count = store.summary_count()?;
    Ok(HttpResponse::Ok().json(responses::Count { count }))
}

#[get("/summaries/stats")]
async fn summary_stats(
    store: web::Data<Store>,
) -> Result<HttpResponse, APIError> {
    Ok(HttpResponse::Ok().json(store.summary_stats()?))
}

#[get("/summaries/{id}")]
async fn get_summary(
    store: web::Data<Store>,
    id: web::Path<u64>,
) -> Result<HttpResponse, APIError> {
    let summary = store.get_summary(SummaryId(id.into_inner()))?;
    Ok(HttpResponse::Ok().json(summary))
}

#[delete("/summaries/{id}")]
async fn delete_summary(
    store: web::Data<Store>,
    id: web::Path<u64>,
) -> Result<HttpResponse, APIError> {
    store.delete_summary(SummaryId(id.into_inner()))?;
    Ok(HttpResponse::Ok().json(responses::Message {
        message: "Summary deleted successfully".to_string(),
    }))
}

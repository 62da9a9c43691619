//! In-memory document and summary storage backing the mock server.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use jiff::Timestamp;
use payloads::{
    DocumentId, SummaryId, SummaryLanguage, SummaryStyle, requests, responses,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("PDF not found")]
    DocumentNotFound,
    #[error("Summary not found")]
    SummaryNotFound,
    #[error("{0}")]
    Injected(String),
}

/// Endpoints that can be forced to fail, for exercising client fallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faults {
    pub document_count: bool,
    pub summary_count: bool,
    pub summary_stats: bool,
}

#[derive(Debug, Clone)]
struct StoredDocument {
    document: responses::Document,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct Inner {
    next_document_id: u64,
    next_summary_id: u64,
    documents: BTreeMap<DocumentId, StoredDocument>,
    summaries: BTreeMap<SummaryId, responses::Summary>,
    faults: Faults,
}

#[derive(Default)]
pub struct Store {
    inner: Mutex<Inner>,
}

impl Store {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // a panicking handler only ever leaves fully written entries behind
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_faults(&self, faults: Faults) {
        self.lock().faults = faults;
    }

    pub fn faults(&self) -> Faults {
        self.lock().faults
    }

    /// Store a new document. The stored filename is a fresh uuid with the
    /// original extension; an empty title falls back to the upload name
    /// without its extension.
    pub fn insert_document(
        &self,
        original_name: &str,
        title: Option<&str>,
        bytes: Vec<u8>,
    ) -> responses::Document {
        let (stem, extension) = match original_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{ext}")),
            None => (original_name, String::new()),
        };
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(stem)
            .to_string();
        let now = Timestamp::now();

        let mut inner = self.lock();
        inner.next_document_id += 1;
        let document = responses::Document {
            id: DocumentId(inner.next_document_id),
            filename: format!("{}{extension}", uuid::Uuid::new_v4()),
            file_size: bytes.len() as u64,
            title,
            page_count: count_pdf_pages(&bytes),
            created_at: now,
            updated_at: now,
        };
        inner.documents.insert(
            document.id,
            StoredDocument {
                document: document.clone(),
                bytes,
            },
        );
        document
    }

    /// Documents whose title contains `search` (case-insensitive), newest
    /// first unless `order=asc` is given.
    pub fn list_documents(
        &self,
        params: &requests::PaginationParams,
    ) -> responses::DocumentPage {
        let inner = self.lock();
        let needle = params.search.trim().to_lowercase();
        let mut matching: Vec<_> = inner
            .documents
            .values()
            .map(|stored| stored.document.clone())
            .filter(|d| {
                needle.is_empty() || d.title.to_lowercase().contains(&needle)
            })
            .collect();
        if params.filters.get("order").map(String::as_str) != Some("asc") {
            matching.reverse();
        }
        paginate(matching, params)
    }

    pub fn get_document(
        &self,
        id: DocumentId,
    ) -> Result<responses::DocumentDetail, StoreError> {
        let inner = self.lock();
        let stored = inner
            .documents
            .get(&id)
            .ok_or(StoreError::DocumentNotFound)?;
        let document = &stored.document;
        Ok(responses::DocumentDetail {
            id: document.id,
            filename: document.filename.clone(),
            file_size: document.file_size,
            title: document.title.clone(),
            page_count: document.page_count,
            created_at: document.created_at,
            updated_at: document.updated_at,
            summaries: inner
                .summaries
                .values()
                .filter(|s| s.pdf_id == id)
                .cloned()
                .collect(),
        })
    }

    /// The stored bytes and the filename to offer for download.
    pub fn document_file(
        &self,
        id: DocumentId,
    ) -> Result<(String, Vec<u8>), StoreError> {
        let inner = self.lock();
        let stored = inner
            .documents
            .get(&id)
            .ok_or(StoreError::DocumentNotFound)?;
        Ok((
            format!("{}.pdf", stored.document.title),
            stored.bytes.clone(),
        ))
    }

    /// Delete a document; its summaries go with it.
    pub fn delete_document(&self, id: DocumentId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner
            .documents
            .remove(&id)
            .ok_or(StoreError::DocumentNotFound)?;
        inner.summaries.retain(|_, summary| summary.pdf_id != id);
        Ok(())
    }

    /// Produce a canned summary in place of the real generator.
    pub fn generate_summary(
        &self,
        id: DocumentId,
        details: &requests::GenerateSummary,
    ) -> Result<responses::Summary, StoreError> {
        let mut inner = self.lock();
        let title = inner
            .documents
            .get(&id)
            .ok_or(StoreError::DocumentNotFound)?
            .document
            .title
            .clone();
        inner.next_summary_id += 1;
        let now = Timestamp::now();
        let summary = responses::Summary {
            id: SummaryId(inner.next_summary_id),
            style: details.style,
            content: canned_summary(&title, details),
            pdf_id: id,
            language: details.language,
            summary_time: match details.style {
                SummaryStyle::Short => 1.5,
                SummaryStyle::General => 3.0,
                SummaryStyle::Detailed => 6.0,
            },
            created_at: now,
            updated_at: now,
        };
        inner.summaries.insert(summary.id, summary.clone());
        Ok(summary)
    }

    pub fn list_summaries(
        &self,
        params: &requests::PaginationParams,
    ) -> responses::SummaryPage {
        let inner = self.lock();
        let needle = params.search.trim().to_lowercase();
        let mut matching: Vec<_> = inner
            .summaries
            .values()
            .filter(|s| {
                needle.is_empty() || s.content.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        matching.reverse();
        paginate(matching, params)
    }

    pub fn get_summary(
        &self,
        id: SummaryId,
    ) -> Result<responses::Summary, StoreError> {
        self.lock()
            .summaries
            .get(&id)
            .cloned()
            .ok_or(StoreError::SummaryNotFound)
    }

    pub fn delete_summary(&self, id: SummaryId) -> Result<(), StoreError> {
        self.lock()
            .summaries
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::SummaryNotFound)
    }

    pub fn document_count(&self) -> Result<u64, StoreError> {
        let inner = self.lock();
        if inner.faults.document_count {
            return Err(StoreError::Injected(
                "Failed to count PDFs".to_string(),
            ));
        }
        Ok(inner.documents.len() as u64)
    }

    pub fn summary_count(&self) -> Result<u64, StoreError> {
        let inner = self.lock();
        if inner.faults.summary_count {
            return Err(StoreError::Injected(
                "Failed to count summaries".to_string(),
            ));
        }
        Ok(inner.summaries.len() as u64)
    }

    pub fn summary_stats(&self) -> Result<responses::SummaryStats, StoreError> {
        let inner = self.lock();
        if inner.faults.summary_stats {
            return Err(StoreError::Injected(
                "Failed to compute summary statistics".to_string(),
            ));
        }
        let mut stats = responses::SummaryStats::default();
        let mut total_time = 0.0;
        for summary in inner.summaries.values() {
            stats.total_summaries += 1;
            total_time += summary.summary_time;
            match summary.language {
                SummaryLanguage::English => stats.by_language.english += 1,
                SummaryLanguage::Indonesian => {
                    stats.by_language.indonesian += 1
                }
            }
            match summary.style {
                SummaryStyle::Short => stats.by_style.short += 1,
                SummaryStyle::General => stats.by_style.general += 1,
                SummaryStyle::Detailed => stats.by_style.detailed += 1,
            }
        }
        if stats.total_summaries > 0 {
            stats.average_processing_time =
                total_time / stats.total_summaries as f64;
        }
        Ok(stats)
    }
}

fn paginate<T>(
    items: Vec<T>,
    params: &requests::PaginationParams,
) -> responses::Page<T> {
    let page = params.page.max(1);
    let items_per_page =
        if (1..=requests::MAX_ITEMS_PER_PAGE).contains(&params.items_per_page) {
            params.items_per_page
        } else {
            requests::DEFAULT_ITEMS_PER_PAGE
        };
    let total_items = items.len() as u64;
    let total_pages = total_items.div_ceil(items_per_page as u64) as u32;
    let offset = ((page - 1) * items_per_page) as usize;
    responses::Page {
        data: items
            .into_iter()
            .skip(offset)
            .take(items_per_page as usize)
            .collect(),
        page,
        items_per_page,
        total_pages,
        total_items,
    }
}

fn canned_summary(title: &str, details: &requests::GenerateSummary) -> String {
    match details.language {
        SummaryLanguage::English => format!(
            "## {} summary\n\nThe document **{title}** covers its main points \
             in a {} style.",
            details.style.label(),
            details.style
        ),
        SummaryLanguage::Indonesian => format!(
            "## Ringkasan {}\n\nDokumen **{title}** merangkum poin utamanya.",
            details.style.label()
        ),
    }
}

/// Count `/Type /Page` objects (but not `/Type /Pages`) in a PDF body.
pub fn count_pdf_pages(bytes: &[u8]) -> u32 {
    const MARKERS: [&[u8]; 2] = [b"/Type /Page", b"/Type/Page"];
    let mut pages = 0;
    for marker in MARKERS {
        pages += bytes
            .windows(marker.len() + 1)
            .filter(|window| {
                window.starts_with(marker) && window[marker.len()] != b's'
            })
            .count() as u32;
    }
    pages
}

/// A minimal PDF body with `pages` page objects, good enough for
/// [`count_pdf_pages`].
pub fn fake_pdf(pages: u32) -> Vec<u8> {
    let mut body = b"%PDF-1.4\n1 0 obj << /Type /Pages >> endobj\n".to_vec();
    for n in 0..pages {
        body.extend_from_slice(
            format!("{} 0 obj << /Type /Page /Parent 1 0 R >> endobj\n", n + 2)
                .as_bytes(),
        );
    }
    body.extend_from_slice(b"%%EOF\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counting_ignores_page_tree_nodes() {
        assert_eq!(count_pdf_pages(&fake_pdf(3)), 3);
        assert_eq!(count_pdf_pages(b"not a pdf"), 0);
    }

    #[test]
    fn titles_fall_back_to_upload_name() {
        let store = Store::default();
        let doc = store.insert_document("report.pdf", Some(" "), fake_pdf(1));
        assert_eq!(doc.title, "report");
        assert!(doc.filename.ends_with(".pdf"));
    }

    #[test]
    fn search_and_pagination() {
        let store = Store::default();
        for name in ["alpha.pdf", "beta report.pdf", "gamma report.pdf"] {
            store.insert_document(name, None, fake_pdf(1));
        }
        let page = store.list_documents(
            &requests::PaginationParams::new(1, 1).with_search("REPORT"),
        );
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data[0].title, "gamma report");
    }

    #[test]
    fn deleting_a_document_removes_its_summaries() {
        let store = Store::default();
        let doc = store.insert_document("a.pdf", None, fake_pdf(1));
        store
            .generate_summary(doc.id, &requests::GenerateSummary::default())
            .unwrap();
        assert_eq!(store.summary_count().unwrap(), 1);
        store.delete_document(doc.id).unwrap();
        assert_eq!(store.summary_count().unwrap(), 0);
    }
}

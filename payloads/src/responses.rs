use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{DocumentId, SummaryId, SummaryLanguage, SummaryStyle};

/// A stored PDF, without its summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Name of the stored file on the backend (not the original upload
    /// name).
    pub filename: String,
    pub file_size: u64,
    pub title: String,
    pub page_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    /// The title when present, otherwise the stored filename.
    pub fn display_name(&self) -> &str {
        display_name(&self.title, &self.filename)
    }
}

/// A document along with every summary generated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub id: DocumentId,
    pub filename: String,
    pub file_size: u64,
    pub title: String,
    pub page_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub summaries: Vec<Summary>,
}

impl DocumentDetail {
    pub fn display_name(&self) -> &str {
        display_name(&self.title, &self.filename)
    }

    /// Drop the summaries, keeping the document metadata.
    pub fn document(&self) -> Document {
        Document {
            id: self.id,
            filename: self.filename.clone(),
            file_size: self.file_size,
            title: self.title.clone(),
            page_count: self.page_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn display_name<'a>(title: &'a str, filename: &'a str) -> &'a str {
    if title.trim().is_empty() {
        filename
    } else {
        title
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: SummaryId,
    pub style: SummaryStyle,
    pub content: String,
    pub pdf_id: DocumentId,
    pub language: SummaryLanguage,
    /// Seconds the backend spent generating this summary.
    pub summary_time: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub items_per_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub type DocumentPage = Page<Document>;
pub type SummaryPage = Page<Summary>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageBreakdown {
    pub english: u64,
    pub indonesian: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleBreakdown {
    pub short: u64,
    pub general: u64,
    pub detailed: u64,
}

/// Aggregate statistics over every generated summary.
///
/// Missing fields deserialize to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryStats {
    pub total_summaries: u64,
    pub by_language: LanguageBreakdown,
    pub by_style: StyleBreakdown,
    pub average_processing_time: f64,
}

impl SummaryStats {
    /// Stats carrying only a total, with every breakdown zeroed.
    pub fn from_count(total_summaries: u64) -> Self {
        Self {
            total_summaries,
            ..Default::default()
        }
    }
}

/// Body of both success acknowledgements and error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// A downloaded document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Filename suggested by the `Content-Disposition` header, if any.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

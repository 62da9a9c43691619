//! Development dataset for the mock backend
//!
//! Gives the UI a realistic starting point: a handful of documents, some
//! with summaries in both languages and all three styles, some without.

use crate::TestApp;
use anyhow::Result;
use payloads::{SummaryLanguage, SummaryStyle, requests, responses};

const DOCUMENT_TITLES: [&str; 6] = [
    "Quarterly report Q1",
    "Quarterly report Q2",
    "Employee handbook",
    "Product roadmap 2025",
    "Security audit findings",
    "Laporan keuangan tahunan",
];

pub struct DevDataset {
    pub documents: Vec<responses::Document>,
    pub summaries: Vec<responses::Summary>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        tracing::info!("📄 Uploading {} documents", DOCUMENT_TITLES.len());
        let documents = app.seed_documents(&DOCUMENT_TITLES).await?;

        tracing::info!("📝 Generating summaries");
        let mut summaries = Vec::new();
        // leave the last two documents without summaries
        for (n, document) in documents.iter().take(4).enumerate() {
            let style = SummaryStyle::ALL[n % SummaryStyle::ALL.len()];
            for language in SummaryLanguage::ALL {
                let details = requests::GenerateSummary { style, language };
                summaries.push(app.create_summary(document, details).await?);
            }
        }

        Ok(Self {
            documents,
            summaries,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📚 Dataset:");
        for document in &self.documents {
            let count = self
                .summaries
                .iter()
                .filter(|s| s.pdf_id == document.id)
                .count();
            tracing::info!(
                "   #{} {} ({} pages, {} summaries)",
                document.id,
                document.title,
                document.page_count,
                count
            );
        }
    }
}

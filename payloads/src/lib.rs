pub mod api_client;
pub mod format;
pub mod requests;
pub mod responses;

pub use api_client::{APIClient, ClientConfig, ClientError};

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Largest file the backend accepts for upload (100 MiB).
pub const MAX_UPLOAD_SIZE: u64 = 100 * 1024 * 1024;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(transparent)]
pub struct DocumentId(pub u64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(transparent)]
pub struct SummaryId(pub u64);

/// How long and how deep a generated summary should be.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStyle {
    Short,
    #[default]
    General,
    Detailed,
}

impl SummaryStyle {
    pub const ALL: [SummaryStyle; 3] = [Self::Short, Self::General, Self::Detailed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::General => "general",
            Self::Detailed => "detailed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Short => "Short",
            Self::General => "General",
            Self::Detailed => "Detailed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Short => "Brief overview of key points",
            Self::General => "Balanced summary with main insights",
            Self::Detailed => "Comprehensive analysis with explanations",
        }
    }
}

impl std::fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| format!("Unknown summary style: {s}"))
    }
}

/// Output language of a generated summary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLanguage {
    #[default]
    English,
    Indonesian,
}

impl SummaryLanguage {
    pub const ALL: [SummaryLanguage; 2] = [Self::English, Self::Indonesian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Indonesian => "indonesian",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Indonesian => "Indonesian",
        }
    }
}

impl std::fmt::Display for SummaryLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SummaryLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == s)
            .ok_or_else(|| format!("Unknown summary language: {s}"))
    }
}

use crate::domain::model::{SourceDocument, TallyReport};
use crate::domain::tally::TallyRun;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Finds place names in free text.
///
/// Every occurrence is returned, in the order it appears, so callers can
/// count repeats.
pub trait PlaceExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Whole file, newlines removed.
    #[default]
    Raw,
    /// JSON array of scraped comments; only comment bodies are scanned.
    Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub const NAMES: [&'static str; 2] = ["json", "csv"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "city_counts.json",
            ExportFormat::Csv => "city_counts.csv",
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn text_mode(&self) -> TextMode;
    fn export_formats(&self) -> &[ExportFormat];

    /// Calendar month a source file covers, if known.
    fn month_of(&self, _source: &str) -> Option<u32> {
        None
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceDocument>>;
    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TallyRun>;
    async fn load(&self, run: TallyRun) -> Result<TallyReport>;
}

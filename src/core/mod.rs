pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    DocumentTally, HiringComment, KeywordCount, RankedEntry, SourceDocument, TallyReport,
};
pub use crate::domain::ports::{
    ConfigProvider, ExportFormat, Pipeline, PlaceExtractor, Storage, TextMode,
};
pub use crate::domain::tally::{FrequencyAggregator, TallyRun};
pub use crate::utils::error::Result;

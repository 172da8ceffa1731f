pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GazetteerExtractor, KeywordMatcher, LocalStorage};
pub use config::TallyConfig;
pub use crate::core::{engine::TallyEngine, pipeline::TallyPipeline};
pub use domain::tally::FrequencyAggregator;
pub use utils::error::{Result, TallyError};

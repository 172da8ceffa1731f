#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::keywords::DEFAULT_KEYWORDS;
use crate::adapters::{GazetteerExtractor, KeywordMatcher};
use crate::core::{ConfigProvider, ExportFormat, TextMode};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

/// The 2018 monthly "Who is hiring" thread dumps, January through December.
pub const DEFAULT_FILES: [&str; 12] = [
    "16052538.json",
    "16282819.json",
    "16492994.json",
    "16735011.json",
    "16967543.json",
    "17205865.json",
    "17442187.json",
    "17663077.json",
    "17902901.json",
    "18113144.json",
    "18354503.json",
    "18589702.json",
];

/// Month each default dump covers, keyed by file name.
pub fn default_months() -> BTreeMap<String, u32> {
    DEFAULT_FILES
        .iter()
        .zip(1u32..)
        .map(|(file, month)| (file.to_string(), month))
        .collect()
}

pub const DEFAULT_BASE_DIR: &str = "..";
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GazetteerSource {
    BuiltIn,
    Names(Vec<String>),
    File(PathBuf),
}

impl GazetteerSource {
    pub fn build(&self) -> Result<GazetteerExtractor> {
        match self {
            GazetteerSource::BuiltIn => GazetteerExtractor::with_default_cities(),
            GazetteerSource::Names(names) => GazetteerExtractor::new(names),
            GazetteerSource::File(path) => GazetteerExtractor::from_file(path),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub base_dir: String,
    pub files: Vec<String>,
    pub mode: TextMode,
    pub months: BTreeMap<String, u32>,
    pub gazetteer: GazetteerSource,
    /// Terms tallied per comment; empty disables keyword counting.
    pub keywords: Vec<String>,
    pub output_dir: String,
    pub formats: Vec<ExportFormat>,
    pub top: Option<usize>,
    pub monitor: bool,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            base_dir: DEFAULT_BASE_DIR.to_string(),
            files: DEFAULT_FILES.iter().map(|f| f.to_string()).collect(),
            mode: TextMode::Raw,
            months: default_months(),
            gazetteer: GazetteerSource::BuiltIn,
            keywords: Vec::new(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            formats: Vec::new(),
            top: None,
            monitor: false,
        }
    }
}

impl TallyConfig {
    /// Layers a TOML file over the defaults. Sections and keys left out keep
    /// their default values.
    pub fn from_toml(file: &TomlConfig) -> Result<Self> {
        let mut config = Self::default();

        if let Some(input) = &file.input {
            if let Some(base_dir) = &input.base_dir {
                config.base_dir = base_dir.clone();
            }
            if let Some(files) = &input.files {
                config.files = files.clone();
            }
            if let Some(mode) = input.mode {
                config.mode = mode;
            }
            if let Some(months) = &input.months {
                config.months = months.clone();
            }
        }

        if let Some(gazetteer) = &file.gazetteer {
            if let Some(path) = &gazetteer.file {
                config.gazetteer = GazetteerSource::File(PathBuf::from(path));
            } else if let Some(cities) = &gazetteer.cities {
                config.gazetteer = GazetteerSource::Names(cities.clone());
            }
        }

        if let Some(output) = &file.output {
            if let Some(dir) = &output.dir {
                config.output_dir = dir.clone();
            }
            if let Some(formats) = &output.formats {
                config.formats = parse_formats(formats.as_slice())?;
            }
            config.top = output.top.or(config.top);
        }

        if let Some(keywords) = &file.keywords {
            if keywords.defaults {
                config.add_default_keywords();
            }
            if let Some(terms) = &keywords.terms {
                config.add_keywords(terms.as_slice());
            }
        }

        config.monitor = file.monitoring_enabled();

        Ok(config)
    }

    pub fn add_default_keywords(&mut self) {
        self.add_keywords(DEFAULT_KEYWORDS);
    }

    pub fn add_keywords<S: AsRef<str>>(&mut self, terms: &[S]) {
        for term in terms {
            let term = term.as_ref();
            if !self.keywords.iter().any(|known| known == term) {
                self.keywords.push(term.to_string());
            }
        }
    }

    /// Matcher for the configured terms, or `None` when keyword counting is off.
    pub fn keyword_matcher(&self) -> Result<Option<KeywordMatcher>> {
        if self.keywords.is_empty() {
            return Ok(None);
        }
        KeywordMatcher::new(&self.keywords).map(Some)
    }
}

pub fn parse_formats<S: AsRef<str>>(values: &[S]) -> Result<Vec<ExportFormat>> {
    let mut formats = Vec::new();
    for value in values {
        let value = value.as_ref().trim().to_ascii_lowercase();
        validation::validate_one_of("output.formats", &value, &ExportFormat::NAMES)?;
        if let Some(format) = ExportFormat::parse(&value) {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
    }
    Ok(formats)
}

impl ConfigProvider for TallyConfig {
    fn input_files(&self) -> &[String] {
        &self.files
    }

    fn text_mode(&self) -> TextMode {
        self.mode
    }

    fn export_formats(&self) -> &[ExportFormat] {
        &self.formats
    }

    fn month_of(&self, source: &str) -> Option<u32> {
        let name = Path::new(source).file_name()?.to_str()?;
        self.months.get(name).copied()
    }
}

impl Validate for TallyConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input.base_dir", &self.base_dir)?;
        validation::validate_non_empty_list("input.files", self.files.as_slice())?;
        for file in &self.files {
            validation::validate_path("input.files", file)?;
        }

        match &self.gazetteer {
            GazetteerSource::BuiltIn => {}
            GazetteerSource::Names(names) => {
                validation::validate_non_empty_list("gazetteer.cities", names.as_slice())?;
            }
            GazetteerSource::File(path) => {
                validation::validate_path("gazetteer.file", &path.to_string_lossy())?;
            }
        }

        for month in self.months.values() {
            validation::validate_range("input.months", *month, 1, 12)?;
        }

        for term in &self.keywords {
            validation::validate_non_empty_string("keywords.terms", term)?;
        }

        if !self.formats.is_empty() {
            validation::validate_path("output.dir", &self.output_dir)?;
        }

        if let Some(top) = self.top {
            validation::validate_positive_number("output.top", top, 1)?;
        }

        Ok(())
    }
}

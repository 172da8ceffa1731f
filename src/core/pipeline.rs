use crate::adapters::KeywordMatcher;
use crate::core::{
    ConfigProvider, DocumentTally, ExportFormat, FrequencyAggregator, HiringComment, Pipeline,
    PlaceExtractor, SourceDocument, Storage, TallyReport, TallyRun, TextMode,
};
use crate::utils::error::{Result, TallyError};
use regex::{Captures, Regex};
use std::sync::OnceLock;

pub struct TallyPipeline<S: Storage, E: PlaceExtractor, C: ConfigProvider> {
    storage: S,
    extractor: E,
    config: C,
    keywords: Option<KeywordMatcher>,
}

impl<S: Storage, E: PlaceExtractor, C: ConfigProvider> TallyPipeline<S, E, C> {
    pub fn new(storage: S, extractor: E, config: C) -> Self {
        Self {
            storage,
            extractor,
            config,
            keywords: None,
        }
    }

    pub fn with_keywords(mut self, keywords: KeywordMatcher) -> Self {
        self.keywords = Some(keywords);
        self
    }
}

/// Turns a file's bytes into the text handed to the extractor.
pub fn prepare_text(path: &str, data: &[u8], mode: TextMode) -> Result<String> {
    Ok(prepare_document(path, data, mode)?.text)
}

fn prepare_document(path: &str, data: &[u8], mode: TextMode) -> Result<SourceDocument> {
    match mode {
        TextMode::Raw => {
            let text = strip_newlines(&decode_escapes(&String::from_utf8_lossy(data)));
            Ok(SourceDocument {
                source: path.to_string(),
                text,
                comments: None,
            })
        }
        TextMode::Comments => {
            let comments: Vec<HiringComment> =
                serde_json::from_slice(data).map_err(|source| TallyError::DecodeError {
                    path: path.to_string(),
                    source,
                })?;
            let bodies: Vec<String> = comments
                .iter()
                .flat_map(|comment| comment.bodies())
                .map(strip_newlines)
                .collect();
            Ok(SourceDocument {
                source: path.to_string(),
                text: bodies.join(" "),
                comments: Some(comments.into_iter().map(|c| c.comment).collect()),
            })
        }
    }
}

// Removed, not replaced with spaces.
fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

fn escape_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\\(?:u([0-9a-fA-F]{4})|([nrtbf])|(["\\/]))"#)
            .expect("valid JSON escape pattern")
    })
}

/// Resolves JSON string escapes left in undecoded text. Control escapes such
/// as `\n` become a space so the words on either side stay apart.
fn decode_escapes(text: &str) -> String {
    escape_pattern()
        .replace_all(text, |caps: &Captures| {
            if let Some(hex) = caps.get(1) {
                return u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
                    .filter(|c| !c.is_control())
                    .map(String::from)
                    .unwrap_or_else(|| " ".to_string());
            }
            if caps.get(2).is_some() {
                return " ".to_string();
            }
            caps.get(3).map_or_else(String::new, |m| m.as_str().to_string())
        })
        .into_owned()
}

fn render_csv(report: &TallyReport) -> Result<Vec<u8>> {
    // Header is written by hand so an empty ranking still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(["city", "count"])?;
    for entry in &report.ranking {
        writer.serialize(entry)?;
    }
    writer
        .into_inner()
        .map_err(|e| TallyError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, E: PlaceExtractor, C: ConfigProvider> Pipeline for TallyPipeline<S, E, C> {
    async fn extract(&self) -> Result<Vec<SourceDocument>> {
        let mode = self.config.text_mode();
        let mut documents = Vec::with_capacity(self.config.input_files().len());

        for path in self.config.input_files() {
            tracing::debug!("Reading {} ({:?} mode)", path, mode);
            let data = self.storage.read_file(path).await?;
            let document = prepare_document(path, &data, mode)?;
            tracing::info!("Successfully opened {} ({} bytes)", path, data.len());
            documents.push(document);
        }

        Ok(documents)
    }

    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TallyRun> {
        let mut run = TallyRun::default();

        for document in documents {
            let mut tally = FrequencyAggregator::new();
            tally.record_all(self.extractor.extract(&document.text));
            tracing::debug!("{}: {} city mentions", document.source, tally.total());

            // Raw files have no comment structure, so the whole file is one unit.
            let keywords = match (&self.keywords, &document.comments) {
                (Some(matcher), Some(comments)) => matcher.tally(comments),
                (Some(matcher), None) => matcher.tally(std::slice::from_ref(&document.text)),
                (None, _) => Default::default(),
            };

            run.push(DocumentTally {
                month: self.config.month_of(&document.source),
                comments: document.comments.as_ref().map(Vec::len),
                mentions: tally.total(),
                counts: tally.into_counts(),
                keywords,
                source: document.source,
            });
        }

        Ok(run)
    }

    async fn load(&self, run: TallyRun) -> Result<TallyReport> {
        let keywords = run.keyword_totals();
        let TallyRun { overall, documents } = run;
        let report = TallyReport {
            generated_at: chrono::Utc::now(),
            documents: documents.len(),
            total_mentions: overall.total(),
            ranking: overall.rank(),
            counts: overall.into_counts(),
            per_document: documents,
            keywords,
        };

        for format in self.config.export_formats() {
            let data = match format {
                ExportFormat::Json => serde_json::to_vec_pretty(&report)?,
                ExportFormat::Csv => render_csv(&report)?,
            };
            tracing::debug!("Writing {} ({} bytes)", format.file_name(), data.len());
            self.storage.write_file(format.file_name(), &data).await?;
            tracing::info!("📁 Report written: {}", format.file_name());
        }

        Ok(report)
    }
}

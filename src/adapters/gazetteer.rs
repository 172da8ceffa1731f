use crate::domain::ports::PlaceExtractor;
use crate::utils::error::{Result, TallyError};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::path::Path;

/// Cities scanned for when no gazetteer is configured.
pub const DEFAULT_CITIES: &[&str] = &[
    "New York",
    "New York City",
    "NYC",
    "San Francisco",
    "Los Angeles",
    "Boston",
    "Austin",
    "Dallas",
    "Denver",
    "Seattle",
    "San Jose",
    "San Diego",
    "Salt Lake City",
    "Portland",
    "Kansas City",
    "Chicago",
    "Atlanta",
    "Miami",
    "Houston",
    "Philadelphia",
    "Pittsburgh",
    "Washington",
    "Baltimore",
    "Minneapolis",
    "Detroit",
    "Phoenix",
    "Boulder",
    "Palo Alto",
    "Mountain View",
    "Menlo Park",
    "Sunnyvale",
    "Santa Monica",
    "Oakland",
    "Berkeley",
    "Cambridge",
    "Raleigh",
    "Nashville",
    "Toronto",
    "Vancouver",
    "Montreal",
    "London",
    "Berlin",
    "Paris",
    "Amsterdam",
    "Dublin",
    "Barcelona",
    "Madrid",
    "Lisbon",
    "Munich",
    "Zurich",
    "Stockholm",
    "Copenhagen",
    "Oslo",
    "Helsinki",
    "Warsaw",
    "Prague",
    "Vienna",
    "Rome",
    "Milan",
    "Tel Aviv",
    "Bangalore",
    "Singapore",
    "Hong Kong",
    "Tokyo",
    "Sydney",
    "Melbourne",
];

// Large gazetteers compile to big automata; the default limit is too tight.
const REGEX_SIZE_LIMIT: usize = 64 << 20;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Escapes `term` and anchors it on a word boundary at each end that starts
/// or finishes with a word character. Edges made of punctuation ("D.C.")
/// are left unanchored, since `\b` there would demand a following letter.
pub(crate) fn bounded(term: &str) -> String {
    let lead = term.chars().next().is_some_and(is_word_char);
    let trail = term.chars().last().is_some_and(is_word_char);
    format!(
        "{}{}{}",
        if lead { r"\b" } else { "" },
        regex::escape(term),
        if trail { r"\b" } else { "" }
    )
}

/// Dictionary-based city matcher.
///
/// Matching is case-sensitive and anchored on word boundaries. When several
/// names start at the same position the longest one wins, so "Salt Lake City"
/// is never reported as "Salt Lake".
#[derive(Debug, Clone)]
pub struct GazetteerExtractor {
    pattern: Regex,
    names: Vec<String>,
}

impl GazetteerExtractor {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        if unique.is_empty() {
            return Err(TallyError::ConfigError {
                message: "gazetteer contains no city names".to_string(),
            });
        }

        let mut names: Vec<String> = unique.into_iter().collect();
        // Alternation is leftmost-first, so longer names must be tried first.
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = names
            .iter()
            .map(|name| bounded(name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!("(?:{})", alternation))
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|e| TallyError::ConfigError {
                message: format!("failed to compile gazetteer: {}", e),
            })?;

        tracing::debug!("Compiled gazetteer with {} names", names.len());

        Ok(Self { pattern, names })
    }

    pub fn with_default_cities() -> Result<Self> {
        Self::new(DEFAULT_CITIES.iter().copied())
    }

    /// Loads one name per line; blank lines and `#` comments are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| TallyError::SourceReadError {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_list(&content)
    }

    pub fn from_list(content: &str) -> Result<Self> {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

impl PlaceExtractor for GazetteerExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_every_occurrence_in_order() {
        let extractor = GazetteerExtractor::with_default_cities().unwrap();
        let found = extractor.extract("Denver or Boston; relocation to Denver is paid.");
        assert_eq!(found, vec!["Denver", "Boston", "Denver"]);
    }

    #[test]
    fn test_longest_name_wins() {
        let extractor = GazetteerExtractor::new(["Salt Lake", "Salt Lake City", "New York", "New York City"]).unwrap();
        let found = extractor.extract("Offices in Salt Lake City and New York City, plus New York.");
        assert_eq!(found, vec!["Salt Lake City", "New York City", "New York"]);
    }

    #[test]
    fn test_respects_word_boundaries() {
        let extractor = GazetteerExtractor::with_default_cities().unwrap();
        assert!(extractor.extract("Bostonian values, Austintatious").is_empty());
        assert_eq!(extractor.extract("(Austin, TX)"), vec!["Austin"]);
    }

    #[test]
    fn test_case_sensitive() {
        let extractor = GazetteerExtractor::with_default_cities().unwrap();
        assert!(extractor.extract("seattle SEATTLE").is_empty());
    }

    #[test]
    fn test_from_list_skips_comments_and_duplicates() {
        let extractor = GazetteerExtractor::from_list("# hubs\nOslo\n\n  Rome  \nOslo\n").unwrap();
        assert_eq!(extractor.name_count(), 2);
        assert_eq!(extractor.extract("Rome, Oslo"), vec!["Rome", "Oslo"]);
    }

    #[test]
    fn test_empty_gazetteer_is_rejected() {
        assert!(GazetteerExtractor::new(Vec::<String>::new()).is_err());
        assert!(GazetteerExtractor::from_list("# nothing here\n\n").is_err());
    }

    #[test]
    fn test_regex_metacharacters_are_escaped() {
        let extractor = GazetteerExtractor::new(["St. Louis"]).unwrap();
        assert_eq!(extractor.extract("St. Louis, MO"), vec!["St. Louis"]);
        assert!(extractor.extract("StX Louis").is_empty());
    }

    #[test]
    fn test_names_with_punctuation_edges_match() {
        let extractor = GazetteerExtractor::new(["Washington", "Washington, D.C."]).unwrap();
        assert_eq!(
            extractor.extract("Offices in Washington, D.C. and more"),
            vec!["Washington, D.C."]
        );
        assert_eq!(extractor.extract("Washington state"), vec!["Washington"]);
    }

    #[test]
    fn test_bounded_edges() {
        assert_eq!(bounded("Boston"), r"\bBoston\b");
        assert_eq!(bounded("D.C."), r"\bD\.C\.");
        assert_eq!(bounded(".NET"), r"\.NET\b");
    }
}

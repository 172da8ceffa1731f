use crate::adapters::gazetteer::bounded;
use crate::domain::model::KeywordCount;
use crate::utils::error::{Result, TallyError};
use regex::Regex;

/// Perks and job titles tallied per comment when `--keywords` is given.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "remote",
    "visa",
    "lunch",
    "Full Time",
    "Contractor",
    "Software Engineer",
    "Senior Software Engineer",
    "Staff Software Engineer",
    "Principal Software Engineer",
    "Engineering Manager",
    "Product Manager",
    "Program Manager",
    "Product Designer",
    "QA",
];

/// Counts how many comments mention each term.
///
/// Terms are matched independently, so a comment mentioning "Senior Software
/// Engineer" also counts toward "Software Engineer". A comment counts at most
/// once per term.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    terms: Vec<(String, Regex)>,
}

impl KeywordMatcher {
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled: Vec<(String, Regex)> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() || compiled.iter().any(|(seen, _)| seen == term) {
                continue;
            }
            let pattern = Regex::new(&bounded(term)).map_err(|e| TallyError::ConfigError {
                message: format!("invalid keyword '{}': {}", term, e),
            })?;
            compiled.push((term.to_string(), pattern));
        }

        if compiled.is_empty() {
            return Err(TallyError::ConfigError {
                message: "keyword list is empty".to_string(),
            });
        }

        Ok(Self { terms: compiled })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }

    pub fn tally<S: AsRef<str>>(&self, comments: &[S]) -> KeywordCount {
        let mut counts: KeywordCount = self.terms.iter().map(|(term, _)| (term.clone(), 0)).collect();
        for comment in comments {
            let comment = comment.as_ref();
            for (term, pattern) in &self.terms {
                if pattern.is_match(comment) {
                    if let Some(count) = counts.get_mut(term) {
                        *count += 1;
                    }
                }
            }
        }
        counts
    }
}

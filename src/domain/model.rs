use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Place name -> number of times the extractor reported it.
pub type PlaceCount = HashMap<String, u64>;

/// Term -> number of comments that mention it.
pub type KeywordCount = BTreeMap<String, u64>;

/// Scannable text of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub source: String,
    pub text: String,
    /// Top-level comment bodies, when the file was decoded as a comment dump.
    pub comments: Option<Vec<String>>,
}

/// One scraped hiring-thread comment, with its reply tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HiringComment {
    #[serde(rename = "Author", default)]
    pub author: String,
    #[serde(rename = "URL", default)]
    pub url: String,
    #[serde(rename = "Comment", default)]
    pub comment: String,
    #[serde(rename = "Replies", default)]
    pub replies: Vec<HiringComment>,
}

impl HiringComment {
    /// Depth-first walk over this comment and every nested reply.
    pub fn bodies(&self) -> Vec<&str> {
        let mut out = vec![self.comment.as_str()];
        for reply in &self.replies {
            out.extend(reply.bodies());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub city: String,
    pub count: u64,
}

impl RankedEntry {
    pub fn as_pair(&self) -> (&str, u64) {
        (self.city.as_str(), self.count)
    }
}

/// Breakdown for a single input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTally {
    pub source: String,
    pub month: Option<u32>,
    pub comments: Option<usize>,
    pub mentions: u64,
    pub counts: PlaceCount,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: KeywordCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyReport {
    pub generated_at: DateTime<Utc>,
    pub documents: usize,
    pub total_mentions: u64,
    pub counts: PlaceCount,
    pub ranking: Vec<RankedEntry>,
    #[serde(default)]
    pub per_document: Vec<DocumentTally>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keywords: KeywordCount,
}

impl TallyReport {
    /// Ranking as `(city, count)` pairs, optionally cut to the first `top` entries.
    pub fn ranked_pairs(&self, top: Option<usize>) -> Vec<(&str, u64)> {
        let limit = top.unwrap_or(self.ranking.len());
        self.ranking
            .iter()
            .take(limit)
            .map(RankedEntry::as_pair)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_bodies_include_nested_replies() {
        let json = r#"[{
            "Author": "acme",
            "URL": "item?id=1",
            "Comment": "Acme | Denver | ONSITE",
            "Replies": [
                {"Author": "b", "Comment": "Is Boston ok?", "Replies": [
                    {"Comment": "Yes, Boston works"}
                ]}
            ]
        }]"#;

        let comments: Vec<HiringComment> = serde_json::from_str(json).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(
            comments[0].bodies(),
            vec!["Acme | Denver | ONSITE", "Is Boston ok?", "Yes, Boston works"]
        );
    }

    #[test]
    fn test_ranked_entry_pair() {
        let entry = RankedEntry {
            city: "Austin".to_string(),
            count: 4,
        };
        assert_eq!(entry.as_pair(), ("Austin", 4));
    }

    #[test]
    fn test_ranked_pairs_respects_top() {
        let report = TallyReport {
            generated_at: Utc::now(),
            documents: 1,
            total_mentions: 6,
            counts: PlaceCount::from([
                ("Austin".to_string(), 3),
                ("Denver".to_string(), 2),
                ("Miami".to_string(), 1),
            ]),
            ranking: vec![
                RankedEntry { city: "Austin".to_string(), count: 3 },
                RankedEntry { city: "Denver".to_string(), count: 2 },
                RankedEntry { city: "Miami".to_string(), count: 1 },
            ],
            per_document: vec![],
            keywords: KeywordCount::new(),
        };

        assert_eq!(report.ranked_pairs(None).len(), 3);
        assert_eq!(report.ranked_pairs(Some(2)), vec![("Austin", 3), ("Denver", 2)]);
        assert_eq!(report.ranked_pairs(Some(10)).len(), 3);
    }
}

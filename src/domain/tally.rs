use crate::domain::model::{DocumentTally, KeywordCount, PlaceCount, RankedEntry};

/// Accumulates place-name occurrences across documents.
///
/// Names are stored exactly as recorded; "NYC" and "New York" are distinct
/// keys. The tally only ever grows during a run.
#[derive(Debug, Clone, Default)]
pub struct FrequencyAggregator {
    counts: PlaceCount,
}

impl FrequencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(name.to_string(), 1);
            }
        }
    }

    pub fn record_all<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.record(name.as_ref());
        }
    }

    /// Entries ordered by count, highest first.
    ///
    /// Entries with equal counts come out in no particular order: the sort
    /// is stable but the map it reads from has no meaningful iteration order.
    pub fn rank(&self) -> Vec<RankedEntry> {
        let mut ranked: Vec<RankedEntry> = self
            .counts
            .iter()
            .map(|(city, count)| RankedEntry {
                city: city.clone(),
                count: *count,
            })
            .collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    pub fn counts(&self) -> &PlaceCount {
        &self.counts
    }

    pub fn count(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Number of `record` calls so far.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn into_counts(self) -> PlaceCount {
        self.counts
    }
}

/// Everything the transform stage produces: the overall tally plus the
/// per-file breakdown it was built from.
#[derive(Debug, Clone, Default)]
pub struct TallyRun {
    pub overall: FrequencyAggregator,
    pub documents: Vec<DocumentTally>,
}

impl TallyRun {
    /// Folds one file's breakdown into the run.
    pub fn push(&mut self, document: DocumentTally) {
        for (city, count) in &document.counts {
            for _ in 0..*count {
                self.overall.record(city);
            }
        }
        self.documents.push(document);
    }

    /// Keyword totals summed over every file.
    pub fn keyword_totals(&self) -> KeywordCount {
        let mut totals = KeywordCount::new();
        for document in &self.documents {
            for (term, count) in &document.keywords {
                *totals.entry(term.clone()).or_insert(0) += count;
            }
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_record_initializes_then_increments() {
        let mut tally = FrequencyAggregator::new();
        tally.record("Paris");
        tally.record("Berlin");
        tally.record("Paris");

        let mut expected = PlaceCount::new();
        expected.insert("Paris".to_string(), 2);
        expected.insert("Berlin".to_string(), 1);
        assert_eq!(tally.counts(), &expected);

        assert_eq!(
            tally.rank(),
            vec![
                RankedEntry {
                    city: "Paris".to_string(),
                    count: 2
                },
                RankedEntry {
                    city: "Berlin".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_empty_tally() {
        let tally = FrequencyAggregator::new();
        assert!(tally.is_empty());
        assert!(tally.counts().is_empty());
        assert!(tally.rank().is_empty());
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_ties_keep_both_entries() {
        let mut tally = FrequencyAggregator::new();
        for _ in 0..3 {
            tally.record("Rome");
        }
        for _ in 0..3 {
            tally.record("Oslo");
        }

        let ranked = tally.rank();
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|entry| entry.count == 3));
        let cities: HashSet<&str> = ranked.iter().map(|entry| entry.city.as_str()).collect();
        assert_eq!(cities, HashSet::from(["Rome", "Oslo"]));
    }

    #[test]
    fn test_count_independent_of_interleaving() {
        let mut tally = FrequencyAggregator::new();
        tally.record_all(["Austin", "Denver", "Austin", "Seattle", "Austin", "Denver"]);

        assert_eq!(tally.count("Austin"), 3);
        assert_eq!(tally.count("Denver"), 2);
        assert_eq!(tally.count("Seattle"), 1);
        assert_eq!(tally.count("Boston"), 0);
    }

    #[test]
    fn test_total_matches_number_of_records() {
        let names = [
            "Boston", "NYC", "New York", "Boston", "San Jose", "NYC", "Boston", "Dallas",
        ];
        let mut tally = FrequencyAggregator::new();
        tally.record_all(names);

        assert_eq!(tally.total(), names.len() as u64);
        assert_eq!(tally.distinct(), 5);
    }

    #[test]
    fn test_rank_is_non_increasing_and_complete() {
        let mut tally = FrequencyAggregator::new();
        let names = [
            "a", "b", "c", "b", "c", "c", "d", "d", "d", "d", "e", "a", "f", "c",
        ];
        tally.record_all(names);

        let ranked = tally.rank();
        assert!(ranked.windows(2).all(|pair| pair[0].count >= pair[1].count));

        let distinct: HashSet<&str> = ranked.iter().map(|entry| entry.city.as_str()).collect();
        assert_eq!(distinct.len(), ranked.len());
        assert_eq!(ranked.len(), tally.distinct());
        for entry in &ranked {
            assert_eq!(tally.count(&entry.city), entry.count);
        }
    }

    #[test]
    fn test_names_are_case_and_form_sensitive() {
        let mut tally = FrequencyAggregator::new();
        tally.record_all(["Portland", "portland", "Portland"]);

        assert_eq!(tally.count("Portland"), 2);
        assert_eq!(tally.count("portland"), 1);
        assert_eq!(tally.into_counts().len(), 2);
    }

    #[test]
    fn test_run_folds_documents_into_overall() {
        let mut january = FrequencyAggregator::new();
        january.record_all(["Boston", "Austin", "Boston"]);
        let mut february = FrequencyAggregator::new();
        february.record_all(["Boston"]);

        let mut run = TallyRun::default();
        run.push(DocumentTally {
            source: "16052538.json".to_string(),
            month: Some(1),
            comments: Some(2),
            mentions: january.total(),
            counts: january.into_counts(),
            keywords: KeywordCount::from([("remote".to_string(), 1), ("visa".to_string(), 2)]),
        });
        run.push(DocumentTally {
            source: "16282819.json".to_string(),
            month: Some(2),
            comments: Some(1),
            mentions: february.total(),
            counts: february.into_counts(),
            keywords: KeywordCount::from([("remote".to_string(), 1)]),
        });

        assert_eq!(run.documents.len(), 2);
        assert_eq!(run.overall.count("Boston"), 3);
        assert_eq!(run.overall.count("Austin"), 1);
        assert_eq!(run.overall.total(), 4);

        let keywords = run.keyword_totals();
        assert_eq!(keywords.get("remote"), Some(&2));
        assert_eq!(keywords.get("visa"), Some(&2));
    }
}

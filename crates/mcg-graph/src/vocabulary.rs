use std::collections::{BTreeMap, BTreeSet};

use mcg_core::Location;
use mcg_morph::{Middle, RejectReason};
use serde::{Deserialize, Serialize};

/// Frequency and locations recorded for one middle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VocabEntry {
    /// Number of token occurrences.
    pub frequency: u64,
    /// Distinct lines the middle occurred on.
    pub locations: BTreeSet<Location>,
}

/// Middle → frequency/locations map built by folding decompositions.
///
/// Every update is a commutative insertion into ordered maps and sets, so the
/// folding order of tokens (or of partial vocabularies via [`Vocabulary::merge`])
/// never changes the result.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "VocabularyRepr", into = "VocabularyRepr")]
pub struct Vocabulary {
    entries: BTreeMap<Middle, VocabEntry>,
    skipped: BTreeMap<RejectReason, u64>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `middle` at `location`.
    pub fn record(&mut self, middle: Middle, location: Location) {
        let entry = self.entries.entry(middle).or_default();
        entry.frequency += 1;
        entry.locations.insert(location);
    }

    /// Records a token that produced no decomposition.
    pub fn record_skip(&mut self, reason: RejectReason) {
        *self.skipped.entry(reason).or_default() += 1;
    }

    /// Folds another vocabulary into this one.
    pub fn merge(&mut self, other: Vocabulary) {
        for (middle, incoming) in other.entries {
            let entry = self.entries.entry(middle).or_default();
            entry.frequency += incoming.frequency;
            entry.locations.extend(incoming.locations);
        }
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_default() += count;
        }
    }

    /// Global frequency of a middle (zero when unseen).
    pub fn frequency(&self, middle: &Middle) -> u64 {
        self.entries.get(middle).map_or(0, |entry| entry.frequency)
    }

    /// Entry for a middle.
    pub fn get(&self, middle: &Middle) -> Option<&VocabEntry> {
        self.entries.get(middle)
    }

    /// Number of distinct middles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in middle order.
    pub fn iter(&self) -> impl Iterator<Item = (&Middle, &VocabEntry)> {
        self.entries.iter()
    }

    /// Total decomposed token occurrences.
    pub fn total_tokens(&self) -> u64 {
        self.entries.values().map(|entry| entry.frequency).sum()
    }

    /// Skipped token counts keyed by reason.
    pub fn skipped(&self) -> &BTreeMap<RejectReason, u64> {
        &self.skipped
    }

    /// Middles meeting the frequency threshold, in middle order.
    pub fn middles_at_least(&self, min_frequency: u64) -> Vec<Middle> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.frequency >= min_frequency)
            .map(|(middle, _)| middle.clone())
            .collect()
    }

    /// Compact, diffable summary for reports.
    pub fn summary(&self, min_frequency: u64, top_n: usize) -> VocabularySummary {
        let mut ranked: Vec<(&Middle, u64)> = self
            .entries
            .iter()
            .map(|(middle, entry)| (middle, entry.frequency))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        VocabularySummary {
            total_tokens: self.total_tokens(),
            distinct_middles: self.len(),
            retained_middles: ranked.iter().filter(|(_, f)| *f >= min_frequency).count(),
            singletons: ranked.iter().filter(|(_, f)| *f == 1).count(),
            empty_middle_frequency: self.frequency(&Middle::Empty),
            skipped: self
                .skipped
                .iter()
                .map(|(reason, count)| (reason.as_str().to_string(), *count))
                .collect(),
            top_middles: ranked
                .into_iter()
                .take(top_n)
                .map(|(middle, frequency)| MiddleFrequency {
                    middle: middle.to_string(),
                    frequency,
                })
                .collect(),
        }
    }
}

/// Frequency summary embedded in analysis reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularySummary {
    /// Decomposed token occurrences.
    pub total_tokens: u64,
    /// Distinct middles (including the empty sentinel).
    pub distinct_middles: usize,
    /// Middles at or above the node threshold.
    pub retained_middles: usize,
    /// Middles seen exactly once.
    pub singletons: usize,
    /// Occurrences of the empty sentinel.
    pub empty_middle_frequency: u64,
    /// Skipped tokens keyed by reason.
    pub skipped: BTreeMap<String, u64>,
    /// Most frequent middles, ties broken by middle order.
    pub top_middles: Vec<MiddleFrequency>,
}

/// One row of [`VocabularySummary::top_middles`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddleFrequency {
    /// Display form of the middle.
    pub middle: String,
    /// Global frequency.
    pub frequency: u64,
}

#[derive(Serialize, Deserialize)]
struct VocabularyRepr {
    entries: Vec<VocabRecord>,
    #[serde(default)]
    skipped: Vec<(RejectReason, u64)>,
}

#[derive(Serialize, Deserialize)]
struct VocabRecord {
    middle: Middle,
    frequency: u64,
    locations: BTreeSet<Location>,
}

impl From<Vocabulary> for VocabularyRepr {
    fn from(value: Vocabulary) -> Self {
        Self {
            entries: value
                .entries
                .into_iter()
                .map(|(middle, entry)| VocabRecord {
                    middle,
                    frequency: entry.frequency,
                    locations: entry.locations,
                })
                .collect(),
            skipped: value.skipped.into_iter().collect(),
        }
    }
}

impl From<VocabularyRepr> for Vocabulary {
    fn from(value: VocabularyRepr) -> Self {
        let mut vocabulary = Vocabulary::new();
        for record in value.entries {
            let entry = vocabulary.entries.entry(record.middle).or_default();
            entry.frequency += record.frequency;
            entry.locations.extend(record.locations);
        }
        for (reason, count) in value.skipped {
            *vocabulary.skipped.entry(reason).or_default() += count;
        }
        vocabulary
    }
}

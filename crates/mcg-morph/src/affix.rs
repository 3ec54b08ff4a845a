use mcg_core::{ErrorInfo, McgError};
use serde::{Deserialize, Serialize};

/// Ordered list of recognised affix strings, longest first.
///
/// Construction re-sorts by character count (stable for equal lengths, so the
/// configured order breaks ties) and removes duplicates. Matching always takes
/// the first entry that fits, which makes longest-match win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AffixTable {
    entries: Vec<String>,
}

impl AffixTable {
    /// Builds a table from configuration, rejecting empty tables and empty affixes.
    pub fn new<I, S>(entries: I) -> Result<Self, McgError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for entry in entries {
            let entry = entry.into();
            if entry.is_empty() {
                return Err(McgError::Config(
                    ErrorInfo::new("empty-affix", "affix tables may not contain empty strings")
                        .with_context("position", collected.len().to_string()),
                ));
            }
            if !collected.contains(&entry) {
                collected.push(entry);
            }
        }
        if collected.is_empty() {
            return Err(McgError::Config(
                ErrorInfo::new("empty-affix-table", "affix table must list at least one affix")
                    .with_hint("provide prefixes and suffixes in the morphology section"),
            ));
        }
        collected.sort_by_key(|entry| std::cmp::Reverse(entry.chars().count()));
        Ok(Self { entries: collected })
    }

    /// Returns the affixes in match order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of affixes in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tables are never empty once constructed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First affix that is a literal prefix of `text`.
    pub(crate) fn match_prefix(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| text.starts_with(entry.as_str()))
            .map(String::as_str)
    }

    /// First affix that is a literal prefix of `text` and leaves at least one character.
    pub(crate) fn match_proper_prefix(&self, text: &str) -> Option<&str> {
        let len = text.chars().count();
        self.entries
            .iter()
            .find(|entry| text.starts_with(entry.as_str()) && len > entry.chars().count())
            .map(String::as_str)
    }

    /// First affix that is a suffix of `text` while `text` stays strictly longer than it.
    pub(crate) fn match_suffix(&self, text: &str) -> Option<&str> {
        let len = text.chars().count();
        self.entries
            .iter()
            .find(|entry| text.ends_with(entry.as_str()) && len > entry.chars().count())
            .map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for AffixTable {
    type Error = McgError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        AffixTable::new(value)
    }
}

impl From<AffixTable> for Vec<String> {
    fn from(value: AffixTable) -> Self {
        value.entries
    }
}

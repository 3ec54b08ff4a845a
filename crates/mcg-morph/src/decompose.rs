use std::fmt;

use mcg_core::{ErrorInfo, McgError};
use serde::{Deserialize, Serialize};

use crate::affix::AffixTable;
use crate::config::MorphConfig;

/// Characters that mark an uncertain or illegible glyph in the transcription.
pub const DEFAULT_UNCERTAINTY_MARKERS: &[char] = &['?', '*', '!', '%'];

/// Tokens with fewer characters than this are never decomposed.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// Display label for [`Middle::Empty`].
pub const EMPTY_MIDDLE_LABEL: &str = "<empty>";

/// Residue left once affixes are stripped.
///
/// `Empty` is a real, countable middle value: it becomes a graph node like any
/// other middle and is never confused with "no decomposition".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Middle {
    /// Non-empty residue.
    Text(String),
    /// The affixes consumed the whole token.
    Empty,
}

impl Middle {
    /// Residue text; empty for [`Middle::Empty`].
    pub fn as_str(&self) -> &str {
        match self {
            Middle::Text(text) => text,
            Middle::Empty => "",
        }
    }

    /// Character length of the residue (zero for the sentinel).
    pub fn char_len(&self) -> usize {
        self.as_str().chars().count()
    }

    /// True for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Middle::Empty)
    }

    fn from_residue(residue: &str) -> Self {
        if residue.is_empty() {
            Middle::Empty
        } else {
            Middle::Text(residue.to_string())
        }
    }
}

impl fmt::Display for Middle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Middle::Text(text) => f.write_str(text),
            Middle::Empty => f.write_str(EMPTY_MIDDLE_LABEL),
        }
    }
}

/// Canonical morpheme decomposition of a single token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MorphemeSet {
    /// Leading articulator, when an articulator table is configured and matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articulator: Option<String>,
    /// Stripped prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Residue after stripping.
    pub middle: Middle,
    /// Stripped suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl MorphemeSet {
    /// Sum of the part lengths; equals the token length for every decomposition.
    pub fn char_len(&self) -> usize {
        let part = |value: &Option<String>| value.as_deref().map_or(0, |s| s.chars().count());
        part(&self.articulator) + part(&self.prefix) + self.middle.char_len() + part(&self.suffix)
    }
}

/// Why a token was not decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// Fewer characters than the configured minimum.
    TooShort,
    /// Contains a reserved uncertainty marker.
    UncertaintyMarker,
}

impl RejectReason {
    /// Stable label used as a counter key in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::TooShort => "too-short",
            RejectReason::UncertaintyMarker => "uncertainty-marker",
        }
    }
}

/// Outcome of [`decompose`]: a morpheme set or an explicit "no decomposition".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Decomposition {
    /// The token decomposed into morphemes.
    Decomposed(MorphemeSet),
    /// The token was skipped; every morpheme field is absent.
    Undecomposable {
        /// Cause of the rejection.
        reason: RejectReason,
    },
}

impl Decomposition {
    /// Returns the morpheme set, if any.
    pub fn morphemes(&self) -> Option<&MorphemeSet> {
        match self {
            Decomposition::Decomposed(set) => Some(set),
            Decomposition::Undecomposable { .. } => None,
        }
    }

    /// Returns the middle, if any.
    pub fn middle(&self) -> Option<&Middle> {
        self.morphemes().map(|set| &set.middle)
    }

    /// Consumes the outcome and returns the middle, if any.
    pub fn into_middle(self) -> Option<Middle> {
        match self {
            Decomposition::Decomposed(set) => Some(set.middle),
            Decomposition::Undecomposable { .. } => None,
        }
    }
}

/// Decomposes a token with the default guard (minimum length and marker set).
pub fn decompose(token_text: &str, prefixes: &AffixTable, suffixes: &AffixTable) -> Decomposition {
    if let Some(reason) = guard(token_text, DEFAULT_MIN_TOKEN_LEN, DEFAULT_UNCERTAINTY_MARKERS) {
        return Decomposition::Undecomposable { reason };
    }
    strip(token_text, None, prefixes, suffixes)
}

fn guard(token_text: &str, min_len: usize, markers: &[char]) -> Option<RejectReason> {
    if token_text.contains(markers) {
        return Some(RejectReason::UncertaintyMarker);
    }
    if token_text.chars().count() < min_len {
        return Some(RejectReason::TooShort);
    }
    None
}

fn strip(
    token_text: &str,
    articulators: Option<&AffixTable>,
    prefixes: &AffixTable,
    suffixes: &AffixTable,
) -> Decomposition {
    let mut rest = token_text;

    let articulator = articulators
        .and_then(|table| table.match_proper_prefix(rest))
        .map(str::to_string);
    if let Some(articulator) = &articulator {
        rest = &rest[articulator.len()..];
    }

    let prefix = prefixes.match_prefix(rest).map(str::to_string);
    if let Some(prefix) = &prefix {
        rest = &rest[prefix.len()..];
    }

    let suffix = suffixes.match_suffix(rest).map(str::to_string);
    if let Some(suffix) = &suffix {
        rest = &rest[..rest.len() - suffix.len()];
    }

    Decomposition::Decomposed(MorphemeSet {
        articulator,
        prefix,
        middle: Middle::from_residue(rest),
        suffix,
    })
}

/// Validated bundle of affix tables and token guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposer {
    prefixes: AffixTable,
    suffixes: AffixTable,
    articulators: Option<AffixTable>,
    markers: Vec<char>,
    min_token_len: usize,
}

impl Decomposer {
    /// Creates a decomposer with the default guard and no articulator slot.
    pub fn new(prefixes: AffixTable, suffixes: AffixTable) -> Self {
        Self {
            prefixes,
            suffixes,
            articulators: None,
            markers: DEFAULT_UNCERTAINTY_MARKERS.to_vec(),
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }

    /// Builds a decomposer from configuration, validating every table eagerly.
    pub fn from_config(config: &MorphConfig) -> Result<Self, McgError> {
        let prefixes = AffixTable::new(config.prefixes.iter().cloned()).map_err(|err| {
            McgError::Config(err.info().clone().with_context("table", "prefixes"))
        })?;
        let suffixes = AffixTable::new(config.suffixes.iter().cloned()).map_err(|err| {
            McgError::Config(err.info().clone().with_context("table", "suffixes"))
        })?;
        let articulators = if config.articulators.is_empty() {
            None
        } else {
            Some(
                AffixTable::new(config.articulators.iter().cloned()).map_err(|err| {
                    McgError::Config(err.info().clone().with_context("table", "articulators"))
                })?,
            )
        };
        if config.min_token_len == 0 {
            return Err(McgError::Config(ErrorInfo::new(
                "invalid-min-token-len",
                "min_token_len must be at least 1",
            )));
        }
        Ok(Self {
            prefixes,
            suffixes,
            articulators,
            markers: config.uncertainty_markers.clone(),
            min_token_len: config.min_token_len,
        })
    }

    /// Decomposes a token; identical input always yields identical output.
    pub fn decompose(&self, token_text: &str) -> Decomposition {
        if let Some(reason) = self.rejects(token_text) {
            return Decomposition::Undecomposable { reason };
        }
        strip(
            token_text,
            self.articulators.as_ref(),
            &self.prefixes,
            &self.suffixes,
        )
    }

    /// Returns the rejection reason a token would receive, if any.
    pub fn rejects(&self, token_text: &str) -> Option<RejectReason> {
        guard(token_text, self.min_token_len, &self.markers)
    }

    /// Configured uncertainty markers.
    pub fn markers(&self) -> &[char] {
        &self.markers
    }

    /// Configured prefix table.
    pub fn prefixes(&self) -> &AffixTable {
        &self.prefixes
    }

    /// Configured suffix table.
    pub fn suffixes(&self) -> &AffixTable {
        &self.suffixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> (AffixTable, AffixTable) {
        (
            AffixTable::new(["qo", "ch", "sh"]).unwrap(),
            AffixTable::new(["dy", "y"]).unwrap(),
        )
    }

    #[test]
    fn prefix_can_consume_whole_token() {
        let (prefixes, suffixes) = tables();
        let outcome = decompose("qo", &prefixes, &suffixes);
        let set = outcome.morphemes().unwrap();
        assert_eq!(set.prefix.as_deref(), Some("qo"));
        assert_eq!(set.middle, Middle::Empty);
        assert_eq!(set.suffix, None);
    }

    #[test]
    fn marker_check_precedes_length_check() {
        let (prefixes, suffixes) = tables();
        assert_eq!(
            decompose("?", &prefixes, &suffixes),
            Decomposition::Undecomposable {
                reason: RejectReason::UncertaintyMarker
            }
        );
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language (scribal dialect) tag carried by a transcription row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum LanguageTag {
    /// Currier language A.
    A,
    /// Currier language B.
    B,
    /// No language assignment recorded.
    #[default]
    Unlabeled,
}

impl LanguageTag {
    /// Maps the raw corpus column to a tag; anything other than `A`/`B` is unlabeled.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "A" | "a" => LanguageTag::A,
            "B" | "b" => LanguageTag::B,
            _ => LanguageTag::Unlabeled,
        }
    }
}

/// One transcribed word occurrence with its location metadata.
///
/// Produced once by the corpus reader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Token text exactly as transcribed.
    pub raw_text: String,
    /// Folio identifier (e.g. `f1r`).
    pub folio_id: String,
    /// Line number within the folio.
    pub line_number: u32,
    /// Language tag of the folio.
    #[serde(default)]
    pub language_tag: LanguageTag,
    /// Placement code describing where on the page the token sits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement_code: Option<String>,
    /// Section code of the folio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_code: Option<String>,
    /// Transcriber track the row belongs to.
    pub transcriber_track: String,
}

impl Token {
    /// Creates a token with the mandatory fields; optional metadata starts empty.
    pub fn new(
        raw_text: impl Into<String>,
        folio_id: impl Into<String>,
        line_number: u32,
        transcriber_track: impl Into<String>,
    ) -> Self {
        Self {
            raw_text: raw_text.into(),
            folio_id: folio_id.into(),
            line_number,
            language_tag: LanguageTag::Unlabeled,
            placement_code: None,
            section_code: None,
            transcriber_track: transcriber_track.into(),
        }
    }

    /// Returns the manuscript line this token belongs to.
    pub fn location(&self) -> Location {
        Location {
            folio_id: self.folio_id.clone(),
            line_number: self.line_number,
        }
    }
}

/// A manuscript line address; the default co-occurrence scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Folio identifier.
    pub folio_id: String,
    /// Line number within the folio.
    pub line_number: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.folio_id, self.line_number)
    }
}

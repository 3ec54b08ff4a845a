//! Tab-separated corpus reader with transcriber, placement and uncertainty filters.

use std::collections::BTreeMap;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use mcg_core::{ErrorInfo, LanguageTag, McgError, Token};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const REQUIRED_COLUMNS: [&str; 7] = [
    "token",
    "folio",
    "line",
    "section",
    "placement",
    "language",
    "transcriber",
];

fn default_transcriber_track() -> String {
    "H".to_string()
}

/// Row selection for the corpus reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusOptions {
    /// Only rows from this transcriber are kept.
    #[serde(default = "default_transcriber_track")]
    pub transcriber_track: String,
    /// Tokens containing any of these are dropped. Empty means the
    /// morphology section's markers are used.
    #[serde(default)]
    pub uncertainty_markers: Vec<char>,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            transcriber_track: default_transcriber_track(),
            uncertainty_markers: Vec::new(),
        }
    }
}

/// Row accounting for one corpus read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Data rows read, header excluded.
    pub rows_read: usize,
    /// Rows turned into tokens.
    pub rows_kept: usize,
    /// Rows from another transcriber.
    pub rows_other_track: usize,
    /// Rows whose token carries an uncertainty marker.
    pub rows_uncertain: usize,
    /// Rows with missing fields or an unparseable line number.
    pub rows_malformed: usize,
}

struct Columns(BTreeMap<&'static str, usize>);

impl Columns {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self, McgError> {
        let mut map = BTreeMap::new();
        for name in REQUIRED_COLUMNS {
            let position = headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| {
                    McgError::Corpus(
                        ErrorInfo::new("missing-column", format!("corpus has no `{name}` column"))
                            .with_context("column", name)
                            .with_context("path", path.display().to_string()),
                    )
                })?;
            map.insert(name, position);
        }
        Ok(Self(map))
    }

    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.0.get(name).and_then(|&idx| record.get(idx)).map(str::trim)
    }
}

/// Reads a tab-delimited transcription file into tokens for one transcriber track.
///
/// Rows from other tracks and rows with uncertain tokens are dropped; rows
/// that cannot be parsed are skipped and counted. Only a missing file or a
/// missing required column is fatal.
pub fn read_corpus(path: &Path, opts: &CorpusOptions) -> Result<(Vec<Token>, CorpusStats), McgError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .map_err(|err| wrap_csv("corpus-open", err, path))?;
    let headers = reader
        .headers()
        .map_err(|err| wrap_csv("corpus-header", err, path))?
        .clone();
    let columns = Columns::from_headers(&headers, path)?;

    let mut tokens = Vec::new();
    let mut stats = CorpusStats::default();
    for result in reader.records() {
        stats.rows_read += 1;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                debug!(error = %err, "unreadable corpus row skipped");
                stats.rows_malformed += 1;
                continue;
            }
        };
        let (Some(text), Some(folio), Some(line), Some(track)) = (
            columns.get(&record, "token"),
            columns.get(&record, "folio"),
            columns.get(&record, "line"),
            columns.get(&record, "transcriber"),
        ) else {
            stats.rows_malformed += 1;
            continue;
        };
        if track != opts.transcriber_track {
            stats.rows_other_track += 1;
            continue;
        }
        if text.chars().any(|c| opts.uncertainty_markers.contains(&c)) {
            stats.rows_uncertain += 1;
            continue;
        }
        let Ok(line_number) = line.parse::<u32>() else {
            stats.rows_malformed += 1;
            continue;
        };
        if text.is_empty() || folio.is_empty() {
            stats.rows_malformed += 1;
            continue;
        }
        let mut token = Token::new(text, folio, line_number, track);
        token.language_tag = columns
            .get(&record, "language")
            .map(LanguageTag::parse)
            .unwrap_or_default();
        token.placement_code = non_empty(columns.get(&record, "placement"));
        token.section_code = non_empty(columns.get(&record, "section"));
        tokens.push(token);
        stats.rows_kept += 1;
    }
    info!(
        path = %path.display(),
        read = stats.rows_read,
        kept = stats.rows_kept,
        malformed = stats.rows_malformed,
        "corpus loaded"
    );
    Ok((tokens, stats))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn wrap_csv(code: &str, err: csv::Error, path: &Path) -> McgError {
    McgError::Corpus(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
}

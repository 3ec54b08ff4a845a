mod support;

use std::fs;

use mcg_core::LanguageTag;
use mcg_run::{read_corpus, CorpusOptions};

fn options() -> CorpusOptions {
    CorpusOptions {
        transcriber_track: "H".into(),
        uncertainty_markers: vec!['?', '*'],
    }
}

#[test]
fn keeps_one_track_and_counts_every_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_corpus(dir.path());
    let (tokens, stats) = read_corpus(&path, &options()).unwrap();
    assert_eq!(stats.rows_read, 123);
    assert_eq!(stats.rows_kept, 120);
    assert_eq!(stats.rows_other_track, 1);
    assert_eq!(stats.rows_uncertain, 1);
    assert_eq!(stats.rows_malformed, 1);
    assert_eq!(tokens.len(), 120);
    assert!(tokens.iter().all(|t| t.transcriber_track == "H"));
    assert_eq!(tokens[0].raw_text, "qokdy");
    assert_eq!(tokens[0].folio_id, "f1r");
    assert_eq!(tokens[0].line_number, 1);
    assert_eq!(tokens[0].language_tag, LanguageTag::A);
    assert_eq!(tokens[0].placement_code.as_deref(), Some("P0"));
    assert_eq!(tokens.last().unwrap().language_tag, LanguageTag::B);
}

#[test]
fn missing_column_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.tsv");
    fs::write(&path, "token\tfolio\tline\tsection\tplacement\tlanguage\nqokdy\tf1r\t1\tH\tP0\tA\n").unwrap();
    let err = read_corpus(&path, &options()).unwrap_err();
    assert_eq!(err.info().code, "missing-column");
    assert_eq!(err.info().context.get("column").map(String::as_str), Some("transcriber"));
}

#[test]
fn short_rows_and_unknown_languages_degrade() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.tsv");
    let text = format!(
        "{}\nqokdy\tf2v\t4\t\t\t-\tH\nqoldy\tf2v\n",
        support::HEADER
    );
    fs::write(&path, text).unwrap();
    let (tokens, stats) = read_corpus(&path, &options()).unwrap();
    assert_eq!(stats.rows_kept, 1);
    assert_eq!(stats.rows_malformed, 1);
    assert_eq!(tokens[0].language_tag, LanguageTag::Unlabeled);
    assert_eq!(tokens[0].section_code, None);
}

#[test]
fn missing_file_is_a_corpus_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_corpus(&dir.path().join("absent.tsv"), &options()).unwrap_err();
    assert_eq!(err.info().code, "corpus-open");
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use mcg_morph::MorphConfig;
use mcg_run::AnalysisConfig;

pub const HEADER: &str = "token\tfolio\tline\tsection\tplacement\tlanguage\ttranscriber";

const MIDDLES: [&str; 12] = ["k", "ol", "ar", "ed", "ai", "or", "al", "ee", "te", "pa", "so", "ri"];

/// Thirty lines of four tokens each over twelve middles, plus rows the
/// reader must drop: another track, an uncertain token, a bad line number.
pub fn corpus_text() -> String {
    let mut rows = vec![HEADER.to_string()];
    for line in 0..30usize {
        let folio = format!("f{}r", line / 10 + 1);
        let language = if line < 15 { "A" } else { "B" };
        for idx in [line, line + 1, line + 3, line * 5] {
            let token = format!("qo{}dy", MIDDLES[idx % MIDDLES.len()]);
            rows.push(format!("{token}\t{folio}\t{}\tH\tP0\t{language}\tH", line + 1));
        }
    }
    rows.push("qokdy\tf1r\t1\tH\tP0\tA\tT".to_string());
    rows.push("qo?dy\tf1r\t1\tH\tP0\tA\tH".to_string());
    rows.push("qoardy\tf1r\tx\tH\tP0\tA\tH".to_string());
    rows.join("\n") + "\n"
}

pub fn write_corpus(dir: &Path) -> PathBuf {
    let path = dir.join("corpus.tsv");
    fs::write(&path, corpus_text()).unwrap();
    path
}

pub fn small_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::new(MorphConfig::new(["qo", "ch"], ["dy", "y"]));
    config.spectral.top_k = 4;
    config.dimensionality.candidate_ks = vec![2, 3, 4];
    config.dimensionality.folds = 2;
    config.dimensionality.test_sample_size = 5;
    config.null_models.n_trials = 12;
    config
}

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use mcg_run::checkpoint::write_json;
use mcg_run::{prepare_graph, AnalysisConfig, ArtifactCache, RunPaths};

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// YAML analysis configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Tab-delimited transcription file.
    #[arg(long)]
    pub corpus: PathBuf,
    /// Output directory; receives `graph_artifact.json`.
    #[arg(long)]
    pub out: PathBuf,
    /// Content-addressed graph cache directory.
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

pub fn run(args: &GraphArgs) -> Result<(), Box<dyn Error>> {
    let config = AnalysisConfig::load(&args.config)?;
    let cache = args.cache.as_ref().map(ArtifactCache::new);
    let prepared = prepare_graph(
        &config,
        &RunPaths {
            corpus: &args.corpus,
            out: &args.out,
            cache: cache.as_ref(),
        },
    )?;
    write_json(&args.out.join("graph_artifact.json"), &prepared.artifact)?;
    println!("{}", prepared.artifact.graph_hash);
    Ok(())
}

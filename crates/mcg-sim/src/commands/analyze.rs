use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use mcg_run::{run_analysis, AnalysisConfig, ArtifactCache, RunPaths};
use tracing::info;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// YAML analysis configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Tab-delimited transcription file.
    #[arg(long)]
    pub corpus: PathBuf,
    /// Output directory for stage artifacts and the report.
    #[arg(long)]
    pub out: PathBuf,
    /// Content-addressed graph cache directory.
    #[arg(long)]
    pub cache: Option<PathBuf>,
    /// Reuse completed stages from an earlier run in `--out`.
    #[arg(long, default_value_t = false)]
    pub resume: bool,
}

pub fn run(args: &AnalyzeArgs) -> Result<(), Box<dyn Error>> {
    let mut config = AnalysisConfig::load(&args.config)?;
    config.resume |= args.resume;
    let cache = args.cache.as_ref().map(ArtifactCache::new);
    let report = run_analysis(
        &config,
        &RunPaths {
            corpus: &args.corpus,
            out: &args.out,
            cache: cache.as_ref(),
        },
    )?;
    info!(out = %args.out.display(), stages = report.stages.len(), "analysis finished");
    println!("{}", report.verdict);
    Ok(())
}

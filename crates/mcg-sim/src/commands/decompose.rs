use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use mcg_morph::Decomposition;
use mcg_run::serde::to_canonical_json_bytes;
use mcg_run::AnalysisConfig;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct DecomposeArgs {
    /// YAML analysis configuration supplying the affix tables.
    #[arg(long)]
    pub config: PathBuf,
    /// Tokens to decompose.
    #[arg(required = true)]
    pub tokens: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    token: &'a str,
    decomposition: Decomposition,
}

pub fn run(args: &DecomposeArgs) -> Result<(), Box<dyn Error>> {
    let config = AnalysisConfig::load(&args.config)?;
    let decomposer = config.decomposer()?;
    let rows: Vec<Row<'_>> = args
        .tokens
        .iter()
        .map(|token| Row {
            token: token.as_str(),
            decomposition: decomposer.decompose(token),
        })
        .collect();
    let json = to_canonical_json_bytes(&rows)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

//! `kermut` command-line tool.

mod summary;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use kermut_core::errors::KermutErrorCode;
use kermut_core::KermutConfig;
use kermut_data::preprocess_data;
use kermut_kernels::{CompositeKernel, EvalParams, HammingKernel, KernelInput, RbfKernel};
use ndarray::s;
use tracing::info;

use crate::summary::{CovarianceSummary, DatasetSummary};

#[derive(Parser, Debug)]
#[command(name = "kermut")]
#[command(version, about = "Kermut dataset preprocessing and kernel evaluation")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, default_value = "kermut.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and align one dataset, print a JSON summary
    Preprocess {
        /// Dataset identifier (file stem of the mutation table)
        dms_id: String,
    },
    /// Evaluate the composite kernel's self-covariance on one dataset
    Covariance {
        /// Dataset identifier (file stem of the mutation table)
        dms_id: String,

        /// Evaluate on the first N rows only
        #[arg(short = 'n', long, default_value_t = 500)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    kermut_core::tracing::init_tracing();
    let cli = Cli::parse();

    let config = KermutConfig::from_file(&cli.config).map_err(|e| anyhow!(e.report()))?;
    info!(config = %cli.config.display(), split = ?config.split, "configuration loaded");

    let output = match cli.command {
        Command::Preprocess { dms_id } => {
            let data = preprocess_data(&config, &dms_id).map_err(|e| anyhow!(e.report()))?;
            serde_json::to_string_pretty(&DatasetSummary::new(&dms_id, &data))?
        }
        Command::Covariance { dms_id, limit } => {
            let data = preprocess_data(&config, &dms_id).map_err(|e| anyhow!(e.report()))?;
            let (Some(tokens), Some(embeddings)) = (data.tokens, data.embeddings) else {
                bail!("covariance needs kernel.use_sequence_kernel = true");
            };
            if tokens.nrows() != embeddings.nrows() {
                bail!(
                    "{dms_id}: {} token rows but {} embedding rows",
                    tokens.nrows(),
                    embeddings.nrows()
                );
            }
            let n = limit.min(tokens.nrows());
            let input = KernelInput::new(
                tokens.slice(s![..n, ..]).to_owned(),
                embeddings.slice(s![..n, ..]).to_owned(),
            )
            .map_err(|e| anyhow!(e.report()))?;

            let kernel = CompositeKernel::new(
                HammingKernel::default(),
                RbfKernel::default(),
                config.kernel.composition,
            );
            let cov = kernel
                .covariance(&input, None, &EvalParams::default())
                .map_err(|e| anyhow!(e.report()))
                .with_context(|| format!("evaluating {} kernel on {dms_id}", config.kernel.composition))?;
            serde_json::to_string_pretty(&CovarianceSummary::new(&dms_id, config.kernel.composition, &cov))?
        }
    };
    println!("{output}");
    Ok(())
}

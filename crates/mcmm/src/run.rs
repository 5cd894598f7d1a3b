use anyhow::{bail, Context, Result};
use clap::Args;
use host_platform::{counter, launch, LaunchOptionsBuilder, RunOutcome};
use serde::Serialize;

use crate::config::{CacheModelArg, ClusterArgs, Settings};

/// Run the benchmark on one host thread per core
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Print a JSON summary instead of the console text
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable result of `mcmm run --json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub cores: u16,
    pub mat_size: usize,
    pub coordinator: u16,
    pub cache_model: CacheModelArg,
    /// `0` means the mailboxes waited forever.
    pub timeout_ms: u64,
    pub cycles: u64,
    pub counter: &'static str,
    pub elapsed_us: u64,
    pub verified: bool,
}

impl RunSummary {
    fn new(settings: &Settings, outcome: &RunOutcome) -> Self {
        Self {
            cores: settings.cluster.core_count(),
            mat_size: settings.cluster.mat_size(),
            coordinator: settings.cluster.coordinator().0,
            cache_model: settings.cache_model,
            timeout_ms: settings.timeout_ms,
            cycles: outcome.cycles,
            counter: counter::SOURCE,
            elapsed_us: outcome.elapsed.as_micros() as u64,
            verified: outcome.verified(),
        }
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let settings = args.cluster.resolve()?;
    let options = LaunchOptionsBuilder::default()
        .cluster(settings.cluster)
        .timeout(settings.timeout)
        .cache_model(settings.cache_model.into())
        .build()?;

    let outcome = launch(&options).context("benchmark run failed")?;

    if args.json {
        let summary = RunSummary::new(&settings, &outcome);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", outcome.console);
    }

    if !outcome.verified() {
        bail!("product matrix does not equal A x I");
    }
    Ok(())
}

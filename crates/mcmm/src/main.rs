mod config;
mod partition;
mod run;

use clap::{ArgAction, Parser, Subcommand};

/// mcmm command-line interface
#[derive(Parser)]
#[command(name = "mcmm", version, about = "Multi-core matrix-multiply benchmark")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the benchmark and print the coordinator's console
    Run(run::RunArgs),
    /// Print the row range every core computes
    Partition(partition::PartitionArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Run(args) => run::run(args),
        Command::Partition(args) => partition::run(args),
    };
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

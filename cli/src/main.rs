use clap::{Parser, Subcommand};
use commands::{
    check::{run_check, CheckArgs},
    dump::{run_dump, DumpArgs},
    stats::{run_stats, StatsArgs},
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read XML documents node by node")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Dump(DumpArgs),
    Check(CheckArgs),
    Stats(StatsArgs),
}

fn main() -> anyhow::Result<()> {
    // log to stderr so that stdout only contains command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Dump(args) => run_dump(args),
        Commands::Check(args) => run_check(args),
        Commands::Stats(args) => run_stats(args),
    }
}

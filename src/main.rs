use clap::{Parser, Subcommand};
use ga_report::commands;

#[derive(Parser)]
#[command(name = "ga-report")]
#[command(version)]
#[command(about = "Google Analytics reporting collector", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one collection cycle and print the records as JSON lines
    Gather(commands::gather::GatherArgs),
    /// Print a sample config file
    SampleConfig,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Gather(args) => {
            std::process::exit(commands::gather::handle_gather(&args));
        }
        Command::SampleConfig => {
            commands::sample_config::handle_sample_config();
        }
    }
}

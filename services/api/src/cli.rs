use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::demo::{run_demo, run_insights, DemoArgs, InsightsArgs};
use crate::server;
use leadscore::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Scoring Engine",
    about = "Score institutional leads and serve dashboard insights from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a roster export offline and print the dashboard summary
    Insights(InsightsArgs),
    /// Run an end-to-end demo over an embedded sample roster
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the lead repository and prediction store from a roster CSV,
    /// overriding the APP_ROSTER environment variable
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Insights(args) => run_insights(args),
        Command::Demo(args) => run_demo(args),
    }
}

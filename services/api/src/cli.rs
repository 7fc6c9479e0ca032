use crate::commands::{run_apply, run_brochure, run_catalog, ApplyArgs, BrochureArgs};
use crate::server;
use campus_leads::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Leads",
    about = "Serve institution pages and capture prospective-student leads",
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
    /// Print the institutions and courses bundled with the service
    Catalog,
    /// Write an institution brochure without submitting a lead
    Brochure(BrochureArgs),
    /// Submit one lead through a form session and download the brochure
    Apply(ApplyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog => run_catalog(),
        Command::Brochure(args) => run_brochure(args),
        Command::Apply(args) => run_apply(args).await,
    }
}

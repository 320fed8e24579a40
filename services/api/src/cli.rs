use crate::render::{
    run_candidate_import, run_deal_evaluation, CandidateImportArgs, DealEvaluationArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use quickliqi::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "QuickLiqi",
    about = "Run the QuickLiqi deal pipeline service or evaluate deals from the command line",
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
    /// Evaluate deal figures against buyer criteria
    Deal {
        #[command(subcommand)]
        command: DealCommand,
    },
    /// Rank listing candidates before they become deals
    Candidates {
        #[command(subcommand)]
        command: CandidateCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DealCommand {
    /// Print derived metrics, both financing scenarios, and criteria shortfalls
    Evaluate(DealEvaluationArgs),
}

#[derive(Subcommand, Debug)]
enum CandidateCommand {
    /// Import a listing spreadsheet and print ranked candidates
    Import(CandidateImportArgs),
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
        Command::Deal {
            command: DealCommand::Evaluate(args),
        } => run_deal_evaluation(args),
        Command::Candidates {
            command: CandidateCommand::Import(args),
        } => run_candidate_import(args),
    }
}

use crate::demo::{
    run_demo, run_feedback_import, run_question_import, run_score, DemoArgs, ImportArgs,
    ScoreArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use maturity_diagnostic::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Maturity Diagnostic",
    about = "Score business maturity self-assessments and serve the diagnosis API",
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
    /// Score diagnoses offline from JSON files
    Diagnosis {
        #[command(subcommand)]
        command: DiagnosisCommand,
    },
    /// Preview spreadsheet imports without touching a running service
    Import {
        #[command(subcommand)]
        command: ImportCommand,
    },
    /// Run an end-to-end diagnosis against the built-in questionnaire
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DiagnosisCommand {
    /// Score an answer file against a questionnaire and print the report
    Score(ScoreArgs),
}

#[derive(Subcommand, Debug)]
enum ImportCommand {
    /// Parse a questions spreadsheet (Ramo de Atividade, Area, Pergunta, Opcao A..D)
    Questions(ImportArgs),
    /// Parse a feedback spreadsheet (Ramo de Atividade, Area, Nivel 1..4)
    Feedbacks(ImportArgs),
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
        Command::Diagnosis {
            command: DiagnosisCommand::Score(args),
        } => run_score(args),
        Command::Import {
            command: ImportCommand::Questions(args),
        } => run_question_import(args),
        Command::Import {
            command: ImportCommand::Feedbacks(args),
        } => run_feedback_import(args),
        Command::Demo(args) => run_demo(args),
    }
}

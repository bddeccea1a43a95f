use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "theoquiz",
    version,
    about = "Catholic theology schools quiz: answer questions, see which schools and axes you lean toward"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Catalog data file to use instead of the built-in one
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Config file to use instead of ./theoquiz.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Take the quiz interactively
    Take(TakeCommand),
    /// Score a list of answers without prompting
    Score(ScoreCommand),
    /// List the questions in the catalog
    Questions(QuestionsCommand),
    /// Check the catalog data for inconsistencies
    Lint,
    /// Ask the configured AI endpoint to explain a question
    Explain(ExplainCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Md,
    Json,
}

#[derive(Args)]
pub struct TakeCommand {
    /// Approximate number of questions, sampled across categories
    #[arg(short, long)]
    pub length: Option<usize>,
    /// Seed for the question sample
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Comma separated option numbers (1-based), '-' for unanswered
    #[arg(short, long)]
    pub answers: String,
    /// Comma separated question numbers (1-based); defaults to every question
    #[arg(long)]
    pub questions: Option<String>,
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
    /// Number of schools to list
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Args)]
pub struct QuestionsCommand {
    /// Only list questions in this category code
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct ExplainCommand {
    /// Question number (1-based) as shown by `questions`
    pub question: usize,
}

mod catalog;
mod cli;
mod config;
mod error;
mod explain;
mod interactive;
mod lint;
mod report;
mod scoring;
mod session;
mod subset;
mod types;

use crate::error::{QuizError, Result};
use crate::explain::{ChatLog, ExplainRequest, Explainer, HttpExplainer};
use crate::types::config::{QuizConfig, ResultsFormat};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const BLOCKING: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn results_format(flag: Option<cli::ReportFormat>, config: &QuizConfig) -> ResultsFormat {
    match flag {
        Some(cli::ReportFormat::Md) => ResultsFormat::Md,
        Some(cli::ReportFormat::Json) => ResultsFormat::Json,
        None => config.results.format,
    }
}

/// Parses a 1-based, comma separated list into 0-based indices; `-` is a gap.
fn parse_index_list(raw: &str, what: &str) -> Result<Vec<Option<usize>>> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item {
            "-" => Ok(None),
            number => match number.parse::<usize>() {
                Ok(0) => Err(QuizError::InvalidArgument(format!(
                    "{what} numbers start at 1"
                ))),
                Ok(value) => Ok(Some(value - 1)),
                Err(_) => Err(QuizError::InvalidArgument(format!(
                    "{what} entry '{number}' is not a number"
                ))),
            },
        })
        .collect()
}

/// Converts a 1-based question number into an index, checking `[1, total]`.
fn question_number(number: usize, total: usize) -> Result<usize> {
    if number == 0 || number > total {
        return Err(QuizError::InvalidArgument(format!(
            "question number must be between 1 and {total}, got {number}"
        )));
    }
    Ok(number - 1)
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cwd = std::env::current_dir()?;
    let config = config::load_config(&cwd, cli.config.as_deref())?;
    let data_path = cli.data.clone().or_else(|| config.quiz.data.clone());
    debug!(data = ?data_path, "loading catalog");

    if let cli::Commands::Lint = cli.command {
        let source = catalog::read_source(data_path.as_deref())?;
        let file = catalog::parse_file(&source)?;
        let findings = lint::lint_findings(&file);
        if !cli.quiet {
            println!(
                "catalog {}: {} schools, {} axes, {} questions",
                &catalog::sha256_hex(source.as_bytes())[..12],
                file.schools.len(),
                file.axes.len(),
                file.questions.len()
            );
        }

        if findings.is_empty() {
            println!("lint: no findings");
            return Ok(exit_code::SUCCESS);
        }

        for finding in &findings {
            let level = if finding.blocking { "BLOCKING" } else { "WARN" };
            println!("[{}] {}: {}", level, finding.id, finding.title);
            println!("  {}", finding.body);
        }

        return if findings.iter().any(|finding| finding.blocking) {
            Ok(exit_code::BLOCKING)
        } else {
            Ok(exit_code::WARNINGS)
        };
    }

    let catalog = &catalog::load(data_path.as_deref())?;

    match cli.command {
        cli::Commands::Take(cmd) => {
            let length = cmd.length.or(config.quiz.length);
            let seed = cmd.seed.or(config.quiz.seed);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let explainer = HttpExplainer::from_config(&config.explain)?;
            let format = results_format(cmd.format, &config);

            let mut session = session::QuizSession::new(catalog, config.results.top);
            let stdin = io::stdin();
            let mut driver = interactive::Driver::new(
                &mut session,
                stdin.lock(),
                io::stdout(),
                Some(&explainer as &dyn Explainer),
                format,
            );
            driver.run(|| match length {
                Some(target) => subset::select_subset(catalog, target, &mut rng),
                None => Ok(catalog.all_questions()),
            })?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Score(cmd) => {
            let selection = match &cmd.questions {
                Some(raw) => parse_index_list(raw, "question")?
                    .into_iter()
                    .map(|index| {
                        index.ok_or_else(|| {
                            QuizError::InvalidArgument(
                                "question list cannot contain '-'".to_string(),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                None => catalog.all_questions(),
            };
            let mut answers = parse_index_list(&cmd.answers, "option")?;
            if answers.len() > selection.len() {
                return Err(QuizError::InvalidArgument(format!(
                    "{} answers given for {} questions",
                    answers.len(),
                    selection.len()
                )));
            }
            answers.resize(selection.len(), None);

            let top = cmd.top.unwrap_or(config.results.top);
            let card = scoring::compute_scores(catalog, &selection, &answers)?;
            let answered = answers.iter().filter(|answer| answer.is_some()).count();
            let results = scoring::build_results(catalog, &card, answered, selection.len(), top);
            println!(
                "{}",
                report::render(&results, results_format(cmd.format, &config))?
            );
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Questions(cmd) => {
            if let Some(code) = &cmd.category {
                if !catalog.categories.iter().any(|category| &category.code == code) {
                    return Err(QuizError::InvalidArgument(format!(
                        "unknown category '{code}'"
                    )));
                }
            }
            for (index, question) in catalog.questions.iter().enumerate() {
                let category = catalog.category_of(question);
                if cmd.category.as_ref().is_some_and(|code| &category.code != code) {
                    continue;
                }
                println!(
                    "{:>3}. [{}] {} ({} options)",
                    index + 1,
                    category.code,
                    question.text,
                    question.options.len()
                );
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Explain(cmd) => {
            let question = question_number(cmd.question, catalog.questions.len())
                .and_then(|index| catalog.question(index))?;
            let request = ExplainRequest::for_question(catalog, question);
            let explainer = HttpExplainer::from_config(&config.explain)?;

            let mut chat = ChatLog::default();
            let reply = chat.ask(&explainer, &request);
            println!("{}", reply.text);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Lint => Ok(exit_code::SUCCESS),
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}

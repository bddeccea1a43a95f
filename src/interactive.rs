use crate::error::{QuizError, Result};
use crate::explain::{ChatLog, ExplainRequest, Explainer, Role};
use crate::report;
use crate::session::{Advance, Phase, QuizSession};
use crate::types::config::ResultsFormat;
use std::io::{BufRead, Write};

const PREFIX_CHARS: usize = 30;

const HELP: &str = "\
Commands:
  <number>  choose that option and continue
  n         next question
  b         previous question
  j <n>     jump to question n
  l         list questions
  r         show results now
  ?         ask for background on this question
  q         quit
";

enum Command {
    Choose(usize),
    Next,
    Back,
    Jump(usize),
    List,
    Results,
    Explain,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if let Ok(number) = line.parse::<usize>() {
        return Command::Choose(number);
    }
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("n"), None) => Command::Next,
        (Some("b"), None) => Command::Back,
        (Some("j"), Some(target)) => match target.parse::<usize>() {
            Ok(number) => Command::Jump(number),
            Err(_) => Command::Unknown(line.to_string()),
        },
        (Some("l"), None) => Command::List,
        (Some("r"), None) => Command::Results,
        (Some("?"), None) => Command::Explain,
        (Some("h" | "help"), None) => Command::Help,
        (Some("q"), None) => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Terminal front end for a session.
pub struct Driver<'s, 'c, R, W> {
    session: &'s mut QuizSession<'c>,
    input: R,
    output: W,
    explainer: Option<&'s dyn Explainer>,
    chat: ChatLog,
    format: ResultsFormat,
}

impl<'s, 'c, R: BufRead, W: Write> Driver<'s, 'c, R, W> {
    pub fn new(
        session: &'s mut QuizSession<'c>,
        input: R,
        output: W,
        explainer: Option<&'s dyn Explainer>,
        format: ResultsFormat,
    ) -> Self {
        Self {
            session,
            input,
            output,
            explainer,
            chat: ChatLog::default(),
            format,
        }
    }

    /// `selection` is called for every new run so a retake can draw a fresh
    /// subset.
    pub fn run<F>(&mut self, mut selection: F) -> Result<()>
    where
        F: FnMut() -> Result<Vec<usize>>,
    {
        loop {
            match self.session.phase() {
                Phase::NotStarted => {
                    self.session.start(selection()?)?;
                    self.render_question()?;
                }
                Phase::InProgress { .. } => {
                    let Some(line) = self.prompt("> ")? else {
                        return Ok(());
                    };
                    if !self.handle(parse_command(&line))? {
                        return Ok(());
                    }
                }
                Phase::ResultsShown { .. } => {
                    let Some(line) = self.prompt("[t] retake  [q] quit > ")? else {
                        return Ok(());
                    };
                    match line.trim() {
                        "t" => self.session.retake()?,
                        "q" => return Ok(()),
                        _ => writeln!(self.output, "Type t to retake or q to quit.")?,
                    }
                }
            }
        }
    }

    /// Returns false when the user quits.
    fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Choose(number) => {
                let chosen = number
                    .checked_sub(1)
                    .ok_or_else(|| QuizError::out_of_range("option", number, 0))
                    .and_then(|option| self.session.select_option(option));
                match chosen {
                    Ok(()) => self.advance()?,
                    Err(QuizError::IndexOutOfRange { .. }) => {
                        let count = self.session.current_question()?.options.len();
                        writeln!(self.output, "Choose an option between 1 and {count}.")?;
                    }
                    Err(e) => return Err(e),
                }
            }
            Command::Next => self.advance()?,
            Command::Back => match self.session.back() {
                Ok(_) => self.render_question()?,
                Err(QuizError::InvalidTransition { .. }) => {
                    writeln!(self.output, "Already at the first question.")?
                }
                Err(e) => return Err(e),
            },
            Command::Jump(number) => {
                let jumped = number
                    .checked_sub(1)
                    .ok_or_else(|| QuizError::out_of_range("position", number, 0))
                    .and_then(|position| self.session.jump_to(position));
                match jumped {
                    Ok(()) => self.render_question()?,
                    Err(QuizError::IndexOutOfRange { .. }) => writeln!(
                        self.output,
                        "Choose a question between 1 and {}.",
                        self.session.question_count()
                    )?,
                    Err(e) => return Err(e),
                }
            }
            Command::List => self.render_list()?,
            Command::Results => self.request_results()?,
            Command::Explain => self.explain()?,
            Command::Help => write!(self.output, "{HELP}")?,
            Command::Quit => return Ok(false),
            Command::Unknown(text) => writeln!(
                self.output,
                "Unknown command '{text}'. Type h for help."
            )?,
        }
        Ok(true)
    }

    fn advance(&mut self) -> Result<()> {
        match self.session.next() {
            Ok(Advance::Moved(_)) => self.render_question(),
            Ok(Advance::Finished) => self.render_results(),
            Err(QuizError::AnswerRequired) => {
                writeln!(
                    self.output,
                    "Please select an answer before continuing."
                )?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn request_results(&mut self) -> Result<()> {
        let input = &mut self.input;
        let output = &mut self.output;
        let shown = self.session.show_results(|answered, total| {
            confirm_incomplete(input, output, answered, total).unwrap_or(false)
        })?;
        if shown {
            self.render_results()
        } else {
            self.render_question()
        }
    }

    fn explain(&mut self) -> Result<()> {
        let Some(explainer) = self.explainer else {
            writeln!(self.output, "[system] Explanations are not available.")?;
            return Ok(());
        };
        let question = self.session.current_question()?;
        let request = ExplainRequest::for_question(self.session.catalog(), question);
        writeln!(self.output, "Asking for background...")?;
        let reply = self.chat.ask(explainer, &request);
        let label = match reply.role {
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::User => "you",
        };
        writeln!(self.output, "[{label}] {}", reply.text)?;
        Ok(())
    }

    fn render_question(&mut self) -> Result<()> {
        let Some(cursor) = self.session.cursor() else {
            return Ok(());
        };
        let question = self.session.current_question()?;
        let total = self.session.question_count();
        let category = &self.session.catalog().category_of(question).name;
        let chosen = self.session.answers()[cursor];

        writeln!(self.output)?;
        writeln!(
            self.output,
            "Question {} of {}  [{}]  Answered: {} / {}",
            cursor + 1,
            total,
            category,
            self.session.answered(),
            total
        )?;
        writeln!(self.output, "{}", question.text)?;
        for (position, option) in question.options.iter().enumerate() {
            let marker = if chosen == Some(position) { '*' } else { ' ' };
            writeln!(self.output, " {marker}{}) {}", position + 1, option.text)?;
        }
        Ok(())
    }

    fn render_list(&mut self) -> Result<()> {
        let cursor = self.session.cursor();
        for position in 0..self.session.question_count() {
            let question = self.session.question_at(position)?;
            let answered = self.session.answers()[position].is_some();
            writeln!(
                self.output,
                "{}{} {}. {}",
                if cursor == Some(position) { '>' } else { ' ' },
                if answered { '*' } else { ' ' },
                position + 1,
                prefix(&question.text)
            )?;
        }
        Ok(())
    }

    fn render_results(&mut self) -> Result<()> {
        if let Some(results) = self.session.results() {
            let rendered = report::render(results, self.format)?;
            writeln!(self.output)?;
            writeln!(self.output, "{rendered}")?;
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        read_line(&mut self.input)
    }
}

fn confirm_incomplete<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    answered: usize,
    total: usize,
) -> Result<bool> {
    write!(
        output,
        "You've answered {answered}/{total}. Show results anyway? [y/N] "
    )?;
    output.flush()?;
    Ok(matches!(
        read_line(input)?.as_deref().map(str::trim),
        Some("y" | "Y" | "yes")
    ))
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn prefix(text: &str) -> String {
    if text.chars().count() > PREFIX_CHARS {
        let head: String = text.chars().take(PREFIX_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample;
    use crate::catalog::Catalog;
    use std::io::Cursor;

    struct Canned;

    impl Explainer for Canned {
        fn explain(&self, request: &ExplainRequest) -> Result<String> {
            Ok(format!("about {}", request.question))
        }
    }

    fn drive(
        catalog: &Catalog,
        script: &str,
        explainer: Option<&dyn Explainer>,
    ) -> (String, Phase) {
        let mut session = QuizSession::new(catalog, 30);
        let mut output = Vec::new();
        {
            let mut driver = Driver::new(
                &mut session,
                Cursor::new(script.to_string()),
                &mut output,
                explainer,
                ResultsFormat::Md,
            );
            driver
                .run(|| Ok(vec![0, 1, 2]))
                .expect("driver should run");
        }
        let phase = session.phase().clone();
        (String::from_utf8(output).expect("utf8 output"), phase)
    }

    #[test]
    fn next_without_answer_prompts_and_stays() {
        let catalog = sample();
        let (output, phase) = drive(&catalog, "n\nq\n", None);

        assert!(output.contains("Please select an answer before continuing."));
        assert!(matches!(phase, Phase::InProgress { cursor: 0 }));
    }

    #[test]
    fn answering_everything_prints_results() {
        let catalog = sample();
        let (output, phase) = drive(&catalog, "1\n1\n2\nq\n", None);

        assert!(output.contains("Question 1 of 3  [Grace]  Answered: 0 / 3"));
        assert!(output.contains("Question 3 of 3  [Church]  Answered: 2 / 3"));
        assert!(output.contains("# Quiz Results"));
        assert!(output.contains("**Augustinian** (score 4)"));
        assert!(matches!(phase, Phase::ResultsShown { .. }));
    }

    #[test]
    fn out_of_range_choice_is_reported() {
        let catalog = sample();
        let (output, _) = drive(&catalog, "5\n0\nq\n", None);
        assert_eq!(output.matches("Choose an option between 1 and 2.").count(), 2);
    }

    #[test]
    fn back_jump_and_list_navigate() {
        let catalog = sample();
        let (output, phase) = drive(&catalog, "b\n2\nb\nj 3\nl\nj 9\nq\n", None);

        assert!(output.contains("Already at the first question."));
        assert!(output.contains(" *2) b"));
        assert!(output.contains("Question 3 of 3"));
        assert!(output.contains(">  3. Q2"));
        assert!(output.contains(" * 1. Q0"));
        assert!(output.contains("Choose a question between 1 and 3."));
        assert!(matches!(phase, Phase::InProgress { cursor: 2 }));
    }

    #[test]
    fn early_results_ask_for_confirmation() {
        let catalog = sample();
        let (output, phase) = drive(&catalog, "r\nn\nr\ny\nq\n", None);

        assert_eq!(
            output.matches("You've answered 0/3. Show results anyway?").count(),
            2
        );
        assert!(output.contains("Answered: 0 / 3\n\n## Your Top Match"));
        assert!(matches!(phase, Phase::ResultsShown { .. }));
    }

    #[test]
    fn retake_starts_a_fresh_run() {
        let catalog = sample();
        let (output, phase) = drive(&catalog, "1\n1\n1\nt\nq\n", None);

        assert_eq!(output.matches("Question 1 of 3").count(), 2);
        assert!(matches!(phase, Phase::InProgress { cursor: 0 }));
    }

    #[test]
    fn explain_prints_reply_without_touching_answers() {
        let catalog = sample();
        let explainer = Canned;
        let (output, phase) = drive(&catalog, "?\nq\n", Some(&explainer));
        assert!(output.contains("[assistant] about Q0"));
        assert!(matches!(phase, Phase::InProgress { cursor: 0 }));

        let (output, _) = drive(&catalog, "?\nq\n", None);
        assert!(output.contains("[system] Explanations are not available."));
    }

    #[test]
    fn end_of_input_quits_cleanly() {
        let catalog = sample();
        let (output, phase) = drive(&catalog, "", None);
        assert!(output.ends_with("> "));
        assert!(matches!(phase, Phase::InProgress { cursor: 0 }));
    }

    #[test]
    fn prefix_truncates_long_text() {
        assert_eq!(prefix("short"), "short");
        let long = "How would you rank the normative authority of Scripture?";
        assert_eq!(prefix(long), "How would you rank the normati...");
    }
}

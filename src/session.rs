use crate::catalog::{Catalog, Question};
use crate::error::{QuizError, Result};
use crate::scoring;
use crate::types::report::QuizResults;
use crate::types::scoring::ScoreCard;
use tracing::info;

#[derive(Debug, Clone)]
pub enum Phase {
    NotStarted,
    InProgress { cursor: usize },
    ResultsShown { results: Box<QuizResults> },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not started",
            Phase::InProgress { .. } => "in progress",
            Phase::ResultsShown { .. } => "showing results",
        }
    }
}

/// Outcome of a `next` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    Finished,
}

/// One quiz run over a borrowed catalog. Scores are never stored; they are
/// derived from `answers` whenever asked for.
#[derive(Debug, Clone)]
pub struct QuizSession<'c> {
    catalog: &'c Catalog,
    selection: Vec<usize>,
    answers: Vec<Option<usize>>,
    phase: Phase,
    top: usize,
}

impl<'c> QuizSession<'c> {
    pub fn new(catalog: &'c Catalog, top: usize) -> Self {
        Self {
            catalog,
            selection: Vec::new(),
            answers: Vec::new(),
            phase: Phase::NotStarted,
            top,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn question_count(&self) -> usize {
        self.selection.len()
    }

    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_some()).count()
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.phase {
            Phase::InProgress { cursor } => Some(cursor),
            _ => None,
        }
    }

    pub fn results(&self) -> Option<&QuizResults> {
        match &self.phase {
            Phase::ResultsShown { results } => Some(results.as_ref()),
            _ => None,
        }
    }

    /// Question shown at `position` in this run.
    pub fn question_at(&self, position: usize) -> Result<&'c Question> {
        let index = *self
            .selection
            .get(position)
            .ok_or_else(|| QuizError::out_of_range("position", position, self.selection.len()))?;
        self.catalog.question(index)
    }

    pub fn current_question(&self) -> Result<&'c Question> {
        let cursor = self.require_in_progress("read the current question")?;
        self.question_at(cursor)
    }

    pub fn scores(&self) -> Result<ScoreCard> {
        scoring::compute_scores(self.catalog, &self.selection, &self.answers)
    }

    pub fn start(&mut self, selection: Vec<usize>) -> Result<()> {
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(self.invalid("start"));
        }
        if selection.is_empty() {
            return Err(QuizError::EmptySelection);
        }
        if let Some(&bad) = selection
            .iter()
            .find(|&&index| index >= self.catalog.questions.len())
        {
            return Err(QuizError::out_of_range(
                "question",
                bad,
                self.catalog.questions.len(),
            ));
        }

        info!(questions = selection.len(), "quiz started");
        self.answers = vec![None; selection.len()];
        self.selection = selection;
        self.phase = Phase::InProgress { cursor: 0 };
        Ok(())
    }

    pub fn select_option(&mut self, option: usize) -> Result<()> {
        let cursor = self.require_in_progress("select an option")?;
        let question = self.question_at(cursor)?;
        if option >= question.options.len() {
            return Err(QuizError::out_of_range(
                "option",
                option,
                question.options.len(),
            ));
        }
        self.answers[cursor] = Some(option);
        Ok(())
    }

    pub fn next(&mut self) -> Result<Advance> {
        let cursor = self.require_in_progress("advance")?;
        if self.answers[cursor].is_none() {
            return Err(QuizError::AnswerRequired);
        }
        if cursor + 1 < self.selection.len() {
            self.phase = Phase::InProgress { cursor: cursor + 1 };
            Ok(Advance::Moved(cursor + 1))
        } else {
            self.finish()?;
            Ok(Advance::Finished)
        }
    }

    pub fn back(&mut self) -> Result<usize> {
        let cursor = self.require_in_progress("go back")?;
        if cursor == 0 {
            return Err(QuizError::InvalidTransition {
                action: "go back",
                state: "at the first question",
            });
        }
        self.phase = Phase::InProgress { cursor: cursor - 1 };
        Ok(cursor - 1)
    }

    pub fn jump_to(&mut self, position: usize) -> Result<()> {
        self.require_in_progress("jump")?;
        if position >= self.selection.len() {
            return Err(QuizError::out_of_range(
                "position",
                position,
                self.selection.len(),
            ));
        }
        self.phase = Phase::InProgress { cursor: position };
        Ok(())
    }

    /// Shows results now. When fewer than half the questions are answered
    /// `confirm(answered, total)` decides; returns whether results are shown.
    pub fn show_results<F>(&mut self, confirm: F) -> Result<bool>
    where
        F: FnOnce(usize, usize) -> bool,
    {
        self.require_in_progress("show results")?;
        let answered = self.answered();
        let total = self.selection.len();
        if answered < total / 2 && !confirm(answered, total) {
            return Ok(false);
        }
        self.finish()?;
        Ok(true)
    }

    pub fn retake(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::ResultsShown { .. }) {
            return Err(self.invalid("retake"));
        }
        info!("quiz reset for retake");
        self.selection.clear();
        self.answers.clear();
        self.phase = Phase::NotStarted;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let card = self.scores()?;
        let results = scoring::build_results(
            self.catalog,
            &card,
            self.answered(),
            self.selection.len(),
            self.top,
        );
        info!(
            answered = results.answered,
            total = results.total,
            top = results.top_match.as_ref().map(|top| top.code.as_str()).unwrap_or("-"),
            "quiz finished"
        );
        self.phase = Phase::ResultsShown {
            results: Box::new(results),
        };
        Ok(())
    }

    fn require_in_progress(&self, action: &'static str) -> Result<usize> {
        match self.phase {
            Phase::InProgress { cursor } => Ok(cursor),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            state: self.phase.name(),
        }
    }
}

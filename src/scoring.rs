use crate::catalog::{Axis, Catalog, SchoolId};
use crate::error::{QuizError, Result};
use crate::types::report::{AxisReading, QuizResults, RankedSchool, TopMatch};
use crate::types::scoring::{Score, ScoreCard};
use chrono::Utc;

/// Sums option school weights and question axis weights over every answered
/// position. `answers[i]` is the choice made for `selection[i]`.
pub fn compute_scores(
    catalog: &Catalog,
    selection: &[usize],
    answers: &[Option<usize>],
) -> Result<ScoreCard> {
    if answers.len() != selection.len() {
        return Err(QuizError::out_of_range(
            "answer",
            answers.len(),
            selection.len(),
        ));
    }

    let mut card = ScoreCard::zeroed(catalog);
    for (&question_index, answer) in selection.iter().zip(answers) {
        let question = catalog.question(question_index)?;
        let Some(choice) = *answer else {
            continue;
        };
        let option = question
            .options
            .get(choice)
            .ok_or_else(|| QuizError::out_of_range("option", choice, question.options.len()))?;

        for &(school, delta) in &option.weights {
            let total = &mut card.schools[school.index()];
            *total = total.saturating_add(delta);
        }
        // Axis movement follows the question topic, not the chosen stance.
        for &(axis, delta) in &question.axis_weights {
            let total = &mut card.axes[axis.index()];
            *total = total.saturating_add(delta);
        }
    }
    Ok(card)
}

/// Schools by score descending; ties keep declaration order.
pub fn rank_schools(catalog: &Catalog, card: &ScoreCard) -> Vec<(SchoolId, Score)> {
    let mut ranked: Vec<_> = catalog
        .school_ids()
        .map(|id| (id, card.school(id)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

pub fn normalize_axis(axis: &Axis, raw: Score) -> i32 {
    raw.saturating_mul(axis.multiplier)
        .saturating_add(50)
        .clamp(0, 100)
}

pub fn axis_profile(catalog: &Catalog, card: &ScoreCard) -> Vec<AxisReading> {
    catalog
        .axis_ids()
        .map(|id| {
            let axis = catalog.axis(id);
            let raw = card.axis(id);
            AxisReading {
                code: axis.code.clone(),
                name: axis.name.clone(),
                low: axis.low.clone(),
                high: axis.high.clone(),
                raw,
                normalized: normalize_axis(axis, raw),
            }
        })
        .collect()
}

pub fn build_results(
    catalog: &Catalog,
    card: &ScoreCard,
    answered: usize,
    total: usize,
    top: usize,
) -> QuizResults {
    let ranked = rank_schools(catalog, card);

    let top_match = ranked.first().map(|&(id, score)| {
        let school = catalog.school(id);
        TopMatch {
            code: school.code.clone(),
            name: school.name.clone(),
            score,
            summary: school.summary.clone(),
            affirmations: school.affirmations.clone(),
            patron: school.patron.clone(),
        }
    });

    let ranking = ranked
        .iter()
        .take(top)
        .enumerate()
        .map(|(position, &(id, score))| {
            let school = catalog.school(id);
            RankedSchool {
                rank: position + 1,
                code: school.code.clone(),
                name: school.name.clone(),
                score,
            }
        })
        .collect();

    QuizResults {
        generated_at: Utc::now().to_rfc3339(),
        catalog_version: catalog.version.clone(),
        answered,
        total,
        top_match,
        ranking,
        axes: axis_profile(catalog, card),
    }
}

use crate::types::catalog::Patron;
use crate::types::scoring::Score;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub body: String,
    pub blocking: bool,
    pub question: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedSchool {
    pub rank: usize,
    pub code: String,
    pub name: String,
    pub score: Score,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisReading {
    pub code: String,
    pub name: String,
    pub low: String,
    pub high: String,
    pub raw: Score,
    pub normalized: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopMatch {
    pub code: String,
    pub name: String,
    pub score: Score,
    pub summary: String,
    pub affirmations: Vec<String>,
    pub patron: Patron,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResults {
    pub generated_at: String,
    pub catalog_version: String,
    pub answered: usize,
    pub total: usize,
    pub top_match: Option<TopMatch>,
    pub ranking: Vec<RankedSchool>,
    pub axes: Vec<AxisReading>,
}

use crate::types::report::QuizResults;

pub fn to_json(results: &QuizResults) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(results)
}

pub mod json;
pub mod md;

use crate::error::QuizError;
use crate::types::config::ResultsFormat;
use crate::types::report::QuizResults;

pub fn render(results: &QuizResults, format: ResultsFormat) -> Result<String, QuizError> {
    match format {
        ResultsFormat::Json => json::to_json(results).map_err(QuizError::Json),
        ResultsFormat::Md => Ok(md::to_markdown(results)),
    }
}

use crate::error::QuizError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizConfig {
    #[serde(default)]
    pub quiz: QuizSection,
    #[serde(default)]
    pub results: ResultsSection,
    #[serde(default)]
    pub explain: ExplainSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizSection {
    pub data: Option<PathBuf>,
    pub length: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultsFormat {
    #[default]
    Md,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultsSection {
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default)]
    pub format: ResultsFormat,
}

impl Default for ResultsSection {
    fn default() -> Self {
        Self {
            top: default_top(),
            format: ResultsFormat::default(),
        }
    }
}

fn default_top() -> usize {
    30
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplainSection {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExplainSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl QuizConfig {
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.quiz.length == Some(0) {
            return Err(QuizError::ConfigParse(
                "quiz.length must be at least 1".to_string(),
            ));
        }
        if self.results.top == 0 {
            return Err(QuizError::ConfigParse(
                "results.top must be at least 1".to_string(),
            ));
        }
        if self.explain.timeout_secs == 0 {
            return Err(QuizError::ConfigParse(
                "explain.timeout_secs must be at least 1".to_string(),
            ));
        }
        if !self.explain.endpoint.starts_with("http://")
            && !self.explain.endpoint.starts_with("https://")
        {
            return Err(QuizError::ConfigParse(format!(
                "explain.endpoint must be an http(s) URL: {}",
                self.explain.endpoint
            )));
        }
        Ok(())
    }
}

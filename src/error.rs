use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("answer required: select an option before continuing")]
    AnswerRequired,

    #[error("{what} index {index} out of range (0..{len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("quiz selection is empty")]
    EmptySelection,

    #[error("cannot {action} while quiz is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("explain request failed: {0}")]
    Explain(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QuizError {
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        QuizError::IndexOutOfRange { what, index, len }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;

pub mod http;

use crate::catalog::{Catalog, Question};
use crate::error::Result;
use serde::Serialize;
use tracing::warn;

pub use http::HttpExplainer;

/// What the explainer sees about one question. Answers and scores are never
/// part of the payload.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainRequest {
    pub question: String,
    pub category: String,
    pub options: Vec<String>,
}

impl ExplainRequest {
    pub fn for_question(catalog: &Catalog, question: &Question) -> Self {
        Self {
            question: question.text.clone(),
            category: catalog.category_of(question).name.clone(),
            options: question
                .options
                .iter()
                .map(|option| option.text.clone())
                .collect(),
        }
    }

    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Explain the theological background of this quiz question from the \"{}\" section, \
             and what distinguishes each answer option. Do not recommend an answer.\n\n\
             Question: {}\n",
            self.category, self.question
        );
        for (position, option) in self.options.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", position + 1, option));
        }
        prompt
    }
}

pub trait Explainer {
    fn explain(&self, request: &ExplainRequest) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// Side-panel conversation. Failures land here as system messages instead of
/// propagating into the quiz.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn ask(&mut self, explainer: &dyn Explainer, request: &ExplainRequest) -> &ChatMessage {
        self.messages.push(ChatMessage {
            role: Role::User,
            text: format!("Explain: {}", request.question),
        });
        let reply = match explainer.explain(request) {
            Ok(text) => ChatMessage {
                role: Role::Assistant,
                text,
            },
            Err(e) => {
                warn!(error = %e, "explain request failed");
                ChatMessage {
                    role: Role::System,
                    text: format!("Sorry, the explanation could not be fetched: {e}"),
                }
            }
        };
        self.messages.push(reply);
        &self.messages[self.messages.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample;
    use crate::error::QuizError;

    struct Canned(&'static str);

    impl Explainer for Canned {
        fn explain(&self, request: &ExplainRequest) -> Result<String> {
            Ok(format!("{} ({} options)", self.0, request.options.len()))
        }
    }

    struct Failing;

    impl Explainer for Failing {
        fn explain(&self, _request: &ExplainRequest) -> Result<String> {
            Err(QuizError::Explain("timed out".to_string()))
        }
    }

    #[test]
    fn request_carries_question_category_and_options() {
        let catalog = sample();
        let request = ExplainRequest::for_question(&catalog, &catalog.questions[2]);

        assert_eq!(request.category, "Church");
        assert_eq!(request.options, vec!["a".to_string(), "b".to_string()]);
        let prompt = request.prompt();
        assert!(prompt.contains("\"Church\" section"));
        assert!(prompt.contains("Question: Q2"));
        assert!(prompt.contains("2. b"));
    }

    #[test]
    fn successful_reply_is_an_assistant_message() {
        let catalog = sample();
        let request = ExplainRequest::for_question(&catalog, &catalog.questions[0]);
        let mut chat = ChatLog::default();

        let reply = chat.ask(&Canned("background"), &request).clone();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text, "background (2 options)");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, Role::User);
    }

    #[test]
    fn failure_becomes_system_message() {
        let catalog = sample();
        let request = ExplainRequest::for_question(&catalog, &catalog.questions[1]);
        let mut chat = ChatLog::default();

        let reply = chat.ask(&Failing, &request).clone();
        assert_eq!(reply.role, Role::System);
        assert!(reply.text.contains("timed out"));
    }
}

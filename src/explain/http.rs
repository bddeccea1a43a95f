use super::{ExplainRequest, Explainer};
use crate::error::{QuizError, Result};
use crate::types::config::ExplainSection;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// OpenAI-compatible chat-completions client.
pub struct HttpExplainer {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpExplainer {
    pub fn from_config(config: &ExplainSection) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuizError::Explain(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: std::env::var(&config.api_key_env)
                .ok()
                .filter(|key| !key.is_empty()),
        })
    }

    fn body(&self, request: &ExplainRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": "You explain Catholic theological positions neutrally and concisely."
                },
                { "role": "user", "content": request.prompt() }
            ]
        })
    }
}

impl Explainer for HttpExplainer {
    fn explain(&self, request: &ExplainRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| QuizError::Explain("no API key configured".to_string()))?;

        debug!(endpoint = %self.endpoint, model = %self.model, "sending explain request");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.body(request))
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| QuizError::Explain(e.to_string()))?;

        let value: Value = response
            .json()
            .map_err(|e| QuizError::Explain(e.to_string()))?;
        extract_reply(&value)
    }
}

fn extract_reply(value: &Value) -> Result<String> {
    value["choices"][0]["message"]["content"]
        .as_str()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| QuizError::Explain("response had no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ExplainRequest {
        ExplainRequest {
            question: "Justification consists primarily in...".to_string(),
            category: "Grace & Justification".to_string(),
            options: vec!["Interior renewal".to_string(), "Forensic".to_string()],
        }
    }

    #[test]
    fn extract_reply_reads_first_choice() {
        let value = json!({ "choices": [{ "message": { "content": "  Background.  " } }] });
        assert_eq!(extract_reply(&value).expect("reply"), "Background.");

        let empty = json!({ "choices": [] });
        assert!(matches!(extract_reply(&empty), Err(QuizError::Explain(_))));
    }

    #[test]
    fn body_uses_configured_model_and_prompt() {
        let explainer = HttpExplainer {
            client: Client::new(),
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            model: "test-model".to_string(),
            api_key: None,
        };
        let body = explainer.body(&request());
        assert_eq!(body["model"], "test-model");
        let prompt = body["messages"][1]["content"].as_str().expect("prompt");
        assert!(prompt.contains("1. Interior renewal"));
    }

    #[test]
    fn missing_api_key_fails_without_network() {
        let explainer = HttpExplainer {
            client: Client::new(),
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            model: "test-model".to_string(),
            api_key: None,
        };
        let err = explainer.explain(&request()).expect_err("should fail");
        assert!(err.to_string().contains("no API key configured"));
    }

    #[test]
    fn unreachable_endpoint_is_an_explain_error() {
        let explainer = HttpExplainer {
            client: Client::builder()
                .timeout(Duration::from_secs(2))
                .build()
                .expect("client should build"),
            endpoint: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            model: "test-model".to_string(),
            api_key: Some("key".to_string()),
        };
        assert!(matches!(
            explainer.explain(&request()),
            Err(QuizError::Explain(_))
        ));
    }
}

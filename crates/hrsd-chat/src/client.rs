//! Chat completion client for the desk assistant

use hrsd_api_contract::ChatReply;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ChatError, Result};

/// OpenAI-compatible endpoint the client talks to unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/";

/// Model used when nothing better can be discovered.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Longest message forwarded to the model. The rest is dropped.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Models tried in order when the endpoint lists what it serves.
/// Low-latency options come first.
const PREFERRED_MODELS: &[&str] = &[
    "llama-3.1-8b-instant",
    "llama-3.2-3b-preview",
    "llama-3.2-11b-text-preview",
    "llama-3.1-70b-instant",
    "llama-3.1-8b-instant-fp16",
];

const SYSTEM_PROMPT: &str = "You are the HR Service Desk Assistant, a helpful, factual HR expert \
with 20 years of experience in HR operations, shared services, policies, payroll, benefits, \
attendance rules, and employee relations. Answer briefly and clearly in the language of the \
user's message (Arabic or English). If the user asks about a specific company policy that you \
don't know, ask clarifying questions. When the user asks about a request tracked on this \
platform, give them all the details you have for it: request number, employee, category, type, \
status, assignee and creation date.";

/// Fields of a tracked request handed to the assistant as grounding.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_no: String,
    pub employee_name: String,
    pub category: String,
    pub request_type: String,
    pub status: String,
    pub assignee: String,
    pub created_at: String,
}

impl RequestContext {
    fn render(&self) -> String {
        format!(
            "Req #: {}\nEmployee: {}\nCategory: {}\nType: {}\nStatus: {}\nAssignee: {}\nCreated: {}",
            self.request_no,
            self.employee_name,
            self.category,
            self.request_type,
            self.status,
            self.assignee,
            self.created_at,
        )
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    #[serde(default)]
    id: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking client for the assistant endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
    agent: ureq::Agent,
    base_url: Url,
    api_key: String,
    model_override: String,
}

impl ChatClient {
    /// Create a client against the given endpoint.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().build();
        Self {
            agent,
            base_url,
            api_key: api_key.into(),
            model_override: String::new(),
        }
    }

    /// Create a client from `GROQ_API_KEY` and the optional
    /// `GROQ_MODEL_ID` override.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        let base_url = Url::parse(DEFAULT_BASE_URL)?;
        let model_override = std::env::var("GROQ_MODEL_ID")
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(Self::new(base_url, api_key).with_model_override(model_override))
    }

    /// Force a particular model. Empty clears the override.
    pub fn with_model_override(mut self, model: impl Into<String>) -> Self {
        self.model_override = model.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Identifiers of the models the endpoint currently serves.
    pub fn list_models(&self) -> Result<Vec<String>> {
        let url = self.base_url.join("models")?;
        let response = self
            .agent
            .get(url.as_str())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .call()?;

        let list: ModelList = response.into_json()?;
        Ok(list
            .data
            .into_iter()
            .map(|entry| entry.id)
            .filter(|id| !id.is_empty())
            .collect())
    }

    /// Settle on a model, surviving a failed listing.
    fn resolve_model(&self) -> String {
        match self.list_models() {
            Ok(available) => pick_model(Some(&available), &self.model_override),
            Err(err) => {
                tracing::debug!(error = %err, "Model listing failed, falling back");
                pick_model(None, &self.model_override)
            }
        }
    }

    /// Ask the assistant a question, optionally grounded in a tracked
    /// request. Returns the reply together with the model that produced
    /// it.
    pub fn ask(&self, message: &str, context: Option<&RequestContext>) -> Result<ChatReply> {
        let message = clip_message(message);
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let model = self.resolve_model();
        tracing::debug!(%model, "Sending chat completion");

        let system_prompt = build_system_prompt(context);
        let request = CompletionRequest {
            model: &model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &message,
                },
            ],
            temperature: 0.4,
            top_p: 0.9,
            max_tokens: 512,
        };

        let url = self.base_url.join("chat/completions")?;
        let response = self
            .agent
            .post(url.as_str())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)?;

        let completion: CompletionResponse = response.into_json()?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        let reply = if text.is_empty() {
            format!("(No text returned from {})", model)
        } else {
            text
        };

        Ok(ChatReply { reply, model })
    }
}

fn build_system_prompt(context: Option<&RequestContext>) -> String {
    match context {
        Some(context) => format!(
            "{}\n\nDetails of the request under discussion:\n{}",
            SYSTEM_PROMPT,
            context.render()
        ),
        None => SYSTEM_PROMPT.to_string(),
    }
}

/// Drop everything past the message limit. Counts characters, not
/// bytes, so Arabic text is cut cleanly.
fn clip_message(message: &str) -> String {
    message.chars().take(MAX_MESSAGE_LEN).collect()
}

/// Choose a chat model.
///
/// With a listing at hand: an available override wins, then the
/// preferred order, then anything named like a llama. Without one the
/// override is trusted as given. The safe default catches the rest.
fn pick_model(available: Option<&[String]>, override_model: &str) -> String {
    match available {
        Some(models) => {
            if !override_model.is_empty() && models.iter().any(|m| m == override_model) {
                return override_model.to_string();
            }
            for preferred in PREFERRED_MODELS {
                if models.iter().any(|m| m == preferred) {
                    return preferred.to_string();
                }
            }
            if let Some(model) = models.iter().find(|m| m.starts_with("llama")) {
                return model.clone();
            }
        }
        None => {
            if !override_model.is_empty() {
                return override_model.to_string();
            }
        }
    }
    DEFAULT_MODEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn listed_override_wins() {
        let available = models(&["mixtral-8x7b", "llama-3.1-8b-instant"]);
        assert_eq!(pick_model(Some(&available), "mixtral-8x7b"), "mixtral-8x7b");
    }

    #[test]
    fn unlisted_override_loses_to_the_preferred_order() {
        let available = models(&["llama-3.2-3b-preview", "llama-3.1-8b-instant"]);
        assert_eq!(
            pick_model(Some(&available), "gpt-priceless"),
            "llama-3.1-8b-instant"
        );
    }

    #[test]
    fn llama_prefix_is_the_last_listed_resort() {
        let available = models(&["whisper-large-v3", "llama-guard-3-8b"]);
        assert_eq!(pick_model(Some(&available), ""), "llama-guard-3-8b");
    }

    #[test]
    fn empty_listing_falls_back_to_the_default() {
        let available = models(&["whisper-large-v3"]);
        assert_eq!(pick_model(Some(&available), ""), DEFAULT_MODEL);
    }

    #[test]
    fn failed_listing_trusts_the_override() {
        assert_eq!(pick_model(None, "my-private-model"), "my-private-model");
        assert_eq!(pick_model(None, ""), DEFAULT_MODEL);
    }

    #[test]
    fn clipping_counts_characters_not_bytes() {
        let long = "سؤال ".repeat(2000);
        let clipped = clip_message(&long);
        assert_eq!(clipped.chars().count(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn empty_message_is_rejected_before_any_network_use() {
        let client = ChatClient::new(
            Url::parse("http://127.0.0.1:9/").expect("static url parses"),
            "test-key",
        );

        let err = client.ask("", None).expect_err("empty message must not be sent");
        assert!(matches!(err, ChatError::EmptyMessage));
    }

    #[test]
    fn context_lands_in_the_system_prompt() {
        let context = RequestContext {
            request_no: "42-1".to_string(),
            employee_name: "Sara".to_string(),
            category: "الدعم التقني".to_string(),
            request_type: "Access".to_string(),
            status: "Submitted".to_string(),
            assignee: "IT Support".to_string(),
            created_at: "2024-03-04T09:00:00+00:00".to_string(),
        };

        let prompt = build_system_prompt(Some(&context));
        assert!(prompt.contains("Req #: 42-1"));
        assert!(prompt.contains("Assignee: IT Support"));
    }
}

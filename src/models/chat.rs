use serde::{Deserialize, Serialize};

/// Reply sent when retrieval produces no candidates.
pub const NOT_FOUND_TEXT: &str = "I couldn't find anything on that topic.";

/// Reply sent when a provider or the store fails mid-pipeline.
pub const APOLOGY_TEXT: &str = "Sorry, I ran into an issue. Please try again later.";

/// One user query paired with the generated response. Immutable once
/// recorded; sessions are append-only sequences of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub bot: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, bot: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            bot: bot.into(),
        }
    }
}

/// An incoming chat request as carried over the serve protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,

    #[serde(default = "default_session_id")]
    pub session_id: String,

    /// Shared secret checked by the server before the pipeline runs.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_session_id() -> String {
    "default".to_string()
}

/// Successful reply payload: the generated response, the grounding source
/// (absent when nothing was found), and the session history after this turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub source: Option<String>,
    #[serde(default)]
    pub history: Vec<Turn>,
}

/// The single best retrieval candidate after selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved {
    pub content: String,
    pub source_url: String,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_defaults_session() {
        let req: ChatRequest = serde_json::from_str(r#"{"query": "hi"}"#).unwrap();
        assert_eq!(req.session_id, "default");
        assert!(req.api_key.is_none());
    }

    #[test]
    fn chat_reply_serializes_null_source() {
        let reply = ChatReply {
            response: NOT_FOUND_TEXT.to_string(),
            source: None,
            history: Vec::new(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json["source"].is_null());
    }
}

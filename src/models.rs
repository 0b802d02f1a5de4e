//! Wire types for the assistant service.

use serde::{Deserialize, Deserializer, Serialize};

/// Request body POSTed to the assistant endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Structured reply from the assistant service.
///
/// `answer` is required. `thought` and `related_tags` may be missing or
/// `null`; an empty `thought` is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub answer: String,
    #[serde(default, deserialize_with = "deserialize_thought")]
    pub thought: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub related_tags: Vec<String>,
}

impl AssistantReply {
    #[must_use]
    pub fn answer_only(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            thought: None,
            related_tags: Vec::new(),
        }
    }
}

fn deserialize_thought<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|thought| !thought.trim().is_empty()))
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

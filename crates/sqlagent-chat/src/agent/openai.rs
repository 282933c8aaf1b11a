//! OpenAI-compatible chat-completions client.

use std::{future::Future, sync::Arc, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
  config::ChatConfig,
  error::{AgentError, Result},
};

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
  pub role:         String,
  #[serde(default)]
  pub content:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tool_calls:   Option<Vec<ToolCall>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tool_call_id: Option<String>,
}

impl WireMessage {
  fn plain(role: &str, content: impl Into<String>) -> Self {
    Self {
      role:         role.to_owned(),
      content:      Some(content.into()),
      tool_calls:   None,
      tool_call_id: None,
    }
  }

  pub fn system(content: impl Into<String>) -> Self { Self::plain("system", content) }

  pub fn user(content: impl Into<String>) -> Self { Self::plain("user", content) }

  /// The result of tool call `id`.
  pub fn tool(id: impl Into<String>, content: impl Into<String>) -> Self {
    Self { tool_call_id: Some(id.into()), ..Self::plain("tool", content) }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
  pub id:       String,
  #[serde(rename = "type", default = "function_kind")]
  pub kind:     String,
  pub function: FunctionCall,
}

fn function_kind() -> String { "function".to_owned() }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
  pub name:      String,
  /// JSON-encoded arguments, as produced by the model.
  pub arguments: String,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: WireMessage,
}

// ─── Trait ────────────────────────────────────────────────────────────────────

/// One chat-completion round-trip.
pub trait Completions: Send + Sync {
  fn complete<'a>(
    &'a self,
    messages: &'a [WireMessage],
    tools: &'a [Value],
  ) -> impl Future<Output = Result<WireMessage>> + Send + 'a;
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// HTTP client for `POST {api_base}/chat/completions`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiClient {
  client: Client,
  config: Arc<ChatConfig>,
}

impl OpenAiClient {
  pub fn new(config: Arc<ChatConfig>) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(120)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
  }
}

/// Request body; temperature is pinned to zero.
pub fn request_body(model: &str, messages: &[WireMessage], tools: &[Value]) -> Value {
  json!({
    "model": model,
    "temperature": 0,
    "messages": messages,
    "tools": tools,
  })
}

impl Completions for OpenAiClient {
  async fn complete(&self, messages: &[WireMessage], tools: &[Value]) -> Result<WireMessage> {
    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&request_body(&self.config.model, messages, tools))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(AgentError::Api { status: status.as_u16(), body });
    }

    let parsed: ChatResponse = resp.json().await?;
    parsed
      .choices
      .into_iter()
      .next()
      .map(|c| c.message)
      .ok_or(AgentError::EmptyResponse)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_tool_call_response() {
    let raw = r#"{
      "id": "chatcmpl-1",
      "choices": [{
        "index": 0,
        "finish_reason": "tool_calls",
        "message": {
          "role": "assistant",
          "content": null,
          "tool_calls": [{
            "id": "call_1",
            "type": "function",
            "function": { "name": "sql_db_query", "arguments": "{\"query\":\"SELECT 1\"}" }
          }]
        }
      }]
    }"#;
    let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
    let msg = &parsed.choices[0].message;
    assert_eq!(msg.content, None);
    let calls = msg.tool_calls.as_ref().unwrap();
    assert_eq!(calls[0].function.name, "sql_db_query");
    assert_eq!(calls[0].kind, "function");
  }

  #[test]
  fn parses_plain_answer_with_null_tool_calls() {
    let raw = r#"{"choices":[{"message":{"role":"assistant","content":"42","tool_calls":null}}]}"#;
    let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.choices[0].message.content.as_deref(), Some("42"));
    assert!(parsed.choices[0].message.tool_calls.is_none());
  }

  #[test]
  fn tool_message_serialises_with_call_id() {
    let v = serde_json::to_value(WireMessage::tool("call_9", "n\n3")).unwrap();
    assert_eq!(v, json!({ "role": "tool", "content": "n\n3", "tool_call_id": "call_9" }));
  }

  #[test]
  fn request_pins_temperature_and_model() {
    let body = request_body("gpt-4o-mini", &[WireMessage::user("hi")], &[]);
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["temperature"], 0);
    assert_eq!(body["messages"][0]["role"], "user");
  }

  #[test]
  fn url_joins_base_without_double_slash() {
    let client = OpenAiClient::new(Arc::new(ChatConfig {
      api_key:       "k".into(),
      model:         "m".into(),
      database_path: "db".into(),
      api_base:      "http://localhost:8080/v1/".into(),
    }))
    .unwrap();
    assert_eq!(client.url(), "http://localhost:8080/v1/chat/completions");
  }
}

//! In-memory conversation history.

use crate::agent::{AgentReply, AgentStep};

pub const GREETING: &str = "How can I help you?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  User,
  Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
  pub role:    Role,
  pub content: String,
  /// Tool calls the agent made on the way to this answer.
  pub trace:   Vec<AgentStep>,
}

impl ChatMessage {
  fn assistant(content: impl Into<String>) -> Self {
    Self { role: Role::Assistant, content: content.into(), trace: Vec::new() }
  }
}

/// Ordered chat history. Always starts with the assistant greeting and is
/// lost when the process exits.
#[derive(Debug, Clone)]
pub struct Session {
  messages: Vec<ChatMessage>,
}

impl Default for Session {
  fn default() -> Self { Self::new() }
}

impl Session {
  pub fn new() -> Self { Self { messages: vec![ChatMessage::assistant(GREETING)] } }

  pub fn messages(&self) -> &[ChatMessage] { &self.messages }

  pub fn push_user(&mut self, content: impl Into<String>) {
    self.messages.push(ChatMessage {
      role:    Role::User,
      content: content.into(),
      trace:   Vec::new(),
    });
  }

  pub fn push_reply(&mut self, reply: AgentReply) {
    self.messages.push(ChatMessage {
      role:    Role::Assistant,
      content: reply.answer,
      trace:   reply.steps,
    });
  }

  pub fn push_error(&mut self, error: impl std::fmt::Display) {
    self.messages.push(ChatMessage::assistant(format!("Error: {error}")));
  }

  /// Drop everything but the greeting.
  pub fn clear(&mut self) { *self = Self::new(); }
}

//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{agent::Agent, config::ChatConfig, session::Session};

pub const MISSING_KEY: &str =
  "Please provide an OpenAI API key (--api-key or OPENAI_API_KEY) to start chatting.";

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<A> {
  /// Immutable session settings.
  pub config: Arc<ChatConfig>,

  /// Conversation so far.
  pub session: Session,

  /// Text being typed into the input line.
  pub input: String,

  /// Lines scrolled up from the bottom of the transcript.
  pub scroll: u16,

  /// Furthest `scroll` can go, as measured by the last draw.
  pub max_scroll: u16,

  /// Transcript rows visible in the last draw; one PageUp/PageDown step.
  pub page_height: u16,

  /// Question submitted but not yet sent; the event loop picks it up after
  /// the next redraw so the "thinking" status is visible.
  pub pending: Option<String>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub agent: Arc<A>,
}

impl<A: Agent> App<A> {
  pub fn new(config: Arc<ChatConfig>, agent: A) -> Self {
    let status_msg = if config.has_api_key() {
      String::new()
    } else {
      MISSING_KEY.to_owned()
    };
    Self {
      config,
      session: Session::new(),
      input: String::new(),
      scroll: 0,
      max_scroll: 0,
      page_height: 1,
      pending: None,
      status_msg,
      agent: Arc::new(agent),
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
      KeyCode::Char('c') if ctrl => return false,
      KeyCode::Esc => return false,

      KeyCode::Char('l') if ctrl => {
        self.session.clear();
        self.scroll = 0;
        self.status_msg = "History cleared.".into();
      }

      KeyCode::Enter => self.submit(),
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Char(c) if !ctrl => self.input.push(c),

      KeyCode::Up => self.scroll_up(1),
      KeyCode::PageUp => self.scroll_up(self.page_height),
      KeyCode::Down => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(self.page_height),
      KeyCode::End => self.scroll = 0,

      _ => {}
    }
    true
  }

  fn scroll_up(&mut self, lines: u16) {
    self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll);
  }

  /// Move the input line into the transcript and queue it for the agent.
  fn submit(&mut self) {
    if self.pending.is_some() {
      return;
    }
    if !self.config.has_api_key() {
      self.status_msg = MISSING_KEY.to_owned();
      return;
    }
    let question = self.input.trim().to_owned();
    if question.is_empty() {
      return;
    }

    self.input.clear();
    self.scroll = 0;
    self.session.push_user(question.clone());
    self.pending = Some(question);
    self.status_msg = "Thinking…".into();
  }

  // ── Agent round-trip ──────────────────────────────────────────────────────

  /// Send the pending question, if any, and record the answer or the error.
  pub async fn process_pending(&mut self) {
    let Some(question) = self.pending.take() else {
      return;
    };

    match self.agent.ask(&question).await {
      Ok(reply) => {
        self.session.push_reply(reply);
        self.status_msg = String::new();
      }
      Err(e) => {
        tracing::error!("agent failed: {e}");
        self.status_msg = format!("Error: {e}");
        self.session.push_error(e);
      }
    }
    self.scroll = 0;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::{
    agent::{AgentReply, AgentStep},
    error::{AgentError, Result},
    session::Role,
  };

  /// Answers with the question echoed back, or fails when told to.
  #[derive(Default)]
  struct Echo {
    fail:  bool,
    asked: Mutex<Vec<String>>,
  }

  impl Agent for Echo {
    async fn ask(&self, question: &str) -> Result<AgentReply> {
      self.asked.lock().unwrap().push(question.to_owned());
      if self.fail {
        return Err(AgentError::EmptyResponse);
      }
      Ok(AgentReply {
        answer: format!("you asked: {question}"),
        steps:  vec![AgentStep {
          tool:   "sql_db_list_tables".into(),
          input:  String::new(),
          output: "customers".into(),
        }],
      })
    }
  }

  fn config(api_key: &str) -> Arc<ChatConfig> {
    Arc::new(ChatConfig {
      api_key:       api_key.into(),
      model:         "gpt-4o-mini".into(),
      database_path: "data/database.db".into(),
      api_base:      "http://localhost".into(),
    })
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn ctrl(c: char) -> KeyEvent { KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL) }

  fn type_text<A: Agent>(app: &mut App<A>, text: &str) {
    for c in text.chars() {
      assert!(app.handle_key(key(KeyCode::Char(c))));
    }
  }

  #[tokio::test]
  async fn question_roundtrip() {
    let mut app = App::new(config("sk-test"), Echo::default());
    type_text(&mut app, "top customers?");
    app.handle_key(key(KeyCode::Enter));

    assert!(app.input.is_empty());
    assert_eq!(app.pending.as_deref(), Some("top customers?"));
    assert_eq!(app.session.messages().last().unwrap().role, Role::User);

    app.process_pending().await;
    assert!(app.pending.is_none());
    assert!(app.status_msg.is_empty());

    let last = app.session.messages().last().unwrap();
    assert_eq!(last.content, "you asked: top customers?");
    assert_eq!(last.trace.len(), 1);
    assert_eq!(app.agent.asked.lock().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn missing_key_blocks_submission() {
    let mut app = App::new(config(""), Echo::default());
    assert_eq!(app.status_msg, MISSING_KEY);

    type_text(&mut app, "hello");
    app.handle_key(key(KeyCode::Enter));
    app.process_pending().await;

    assert_eq!(app.session.messages().len(), 1);
    assert_eq!(app.input, "hello");
    assert!(app.agent.asked.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn agent_error_lands_in_transcript() {
    let agent = Echo { fail: true, ..Default::default() };
    let mut app = App::new(config("sk-test"), agent);
    type_text(&mut app, "anything");
    app.handle_key(key(KeyCode::Enter));
    app.process_pending().await;

    assert!(app.status_msg.starts_with("Error:"));
    assert!(app.session.messages().last().unwrap().content.starts_with("Error:"));
  }

  #[test]
  fn blank_input_is_ignored() {
    let mut app = App::new(config("sk-test"), Echo::default());
    type_text(&mut app, "   ");
    app.handle_key(key(KeyCode::Enter));
    assert!(app.pending.is_none());
    assert_eq!(app.session.messages().len(), 1);
  }

  #[test]
  fn editing_clearing_and_quitting() {
    let mut app = App::new(config("sk-test"), Echo::default());
    type_text(&mut app, "abc");
    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.input, "ab");

    app.session.push_user("earlier");
    app.handle_key(ctrl('l'));
    assert_eq!(app.session.messages().len(), 1);

    assert!(!app.handle_key(ctrl('c')));
    assert!(!app.handle_key(key(KeyCode::Esc)));
  }

  #[test]
  fn scrolling_stops_at_the_top() {
    let mut app = App::new(config("sk-test"), Echo::default());
    app.max_scroll = 5;
    app.page_height = 3;

    app.handle_key(key(KeyCode::PageUp));
    app.handle_key(key(KeyCode::PageUp));
    app.handle_key(key(KeyCode::PageUp));
    assert_eq!(app.scroll, 5);

    app.handle_key(key(KeyCode::PageDown));
    assert_eq!(app.scroll, 2);
    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.scroll, 3);
    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::PageDown));
    assert_eq!(app.scroll, 0);

    app.handle_key(key(KeyCode::Up));
    app.handle_key(key(KeyCode::End));
    assert_eq!(app.scroll, 0);
  }

  #[test]
  fn nothing_to_scroll_before_first_draw() {
    let mut app = App::new(config("sk-test"), Echo::default());
    app.handle_key(key(KeyCode::PageUp));
    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.scroll, 0);
  }
}

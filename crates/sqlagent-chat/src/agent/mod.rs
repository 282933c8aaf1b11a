//! The natural-language-to-SQL agent.
//!
//! The hosted model does all of the planning. This module only relays the
//! question, runs whichever read-only database tools the model asks for, and
//! records each call so the UI can show how the answer was reached.

pub mod openai;
pub mod tools;

use std::{future::Future, path::PathBuf};

use serde_json::Value;

use crate::error::Result;
use openai::{Completions, WireMessage};

/// Upper bound on model round-trips for one question.
pub const MAX_ITERATIONS: usize = 15;

pub const STOPPED_ANSWER: &str = "Agent stopped due to iteration limit.";

const SYSTEM_PROMPT: &str = "\
You answer questions about a SQLite database by calling the tools provided.
Start by listing the tables, then read the schema of the ones that look
relevant. Write one syntactically correct SQLite query at a time, run it, and
read the result before answering. Unless the user asks for a specific number
of rows, limit every query to at most 10 results and order them so the most
interesting rows come first. Select only the columns you need. Never issue
INSERT, UPDATE, DELETE, DROP, or any other statement that changes data. If a
query fails, read the error, fix the query, and try again. If the question has
nothing to do with the database, say you don't know.";

/// One tool invocation made while answering a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStep {
  pub tool:   String,
  pub input:  String,
  pub output: String,
}

/// The final answer plus the intermediate trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
  pub answer: String,
  pub steps:  Vec<AgentStep>,
}

/// Anything that can turn a question into an answer.
pub trait Agent: Send + Sync {
  fn ask<'a>(&'a self, question: &'a str) -> impl Future<Output = Result<AgentReply>> + Send + 'a;
}

/// A tool-calling agent over one SQLite file.
pub struct SqlAgent<C> {
  completions:   C,
  database_path: PathBuf,
}

impl<C: Completions> SqlAgent<C> {
  pub fn new(completions: C, database_path: PathBuf) -> Self {
    Self { completions, database_path }
  }
}

impl<C: Completions> Agent for SqlAgent<C> {
  async fn ask(&self, question: &str) -> Result<AgentReply> {
    let definitions: Vec<Value> = tools::definitions();
    let mut messages = vec![WireMessage::system(SYSTEM_PROMPT), WireMessage::user(question)];
    let mut steps = Vec::new();

    for iteration in 0..MAX_ITERATIONS {
      let reply = self.completions.complete(&messages, &definitions).await?;
      let calls = reply.tool_calls.clone().unwrap_or_default();

      if calls.is_empty() {
        tracing::debug!(iteration, steps = steps.len(), "agent finished");
        return Ok(AgentReply { answer: reply.content.unwrap_or_default(), steps });
      }

      messages.push(reply);
      for call in calls {
        let name = call.function.name;
        let arguments = call.function.arguments;
        tracing::debug!(tool = %name, %arguments, "running tool");

        let output = tools::run(self.database_path.clone(), name.clone(), arguments.clone()).await?;
        steps.push(AgentStep {
          input:  tools::describe_input(&name, &arguments),
          tool:   name,
          output: output.clone(),
        });
        messages.push(WireMessage::tool(call.id, output));
      }
    }

    tracing::warn!(limit = MAX_ITERATIONS, "agent hit iteration limit");
    Ok(AgentReply { answer: STOPPED_ANSWER.to_owned(), steps })
  }
}

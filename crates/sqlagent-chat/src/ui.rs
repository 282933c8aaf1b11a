//! TUI rendering: header, transcript, input line, status bar.

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::{
  agent::{Agent, AgentStep},
  app::App,
  session::{ChatMessage, Role},
};

/// Tool output shown in the trace is cut to this many characters.
const TRACE_OUTPUT_CHARS: usize = 80;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame. Records the transcript's scroll
/// bounds on `app` for the key handler.
pub fn draw<A: Agent>(f: &mut Frame, app: &mut App<A>) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // transcript
      Constraint::Length(3), // input
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);
  draw_transcript(f, rows[1], app);
  draw_input(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<A: Agent>(f: &mut Frame, area: Rect, app: &App<A>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " sqlagent  [Enter] ask  [Ctrl-L] clear  [Esc] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{}  {date} ", app.config.model),
    Style::default().fg(Color::Gray),
  );

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Transcript ───────────────────────────────────────────────────────────────

fn draw_transcript<A: Agent>(f: &mut Frame, area: Rect, app: &mut App<A>) {
  let block = Block::default()
    .title(format!(" {} ", app.config.database_path.display()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for message in app.session.messages() {
    message_lines(message, inner.width as usize, &mut lines);
    lines.push(Line::default());
  }
  if app.pending.is_some() {
    lines.push(Line::from(Span::styled(
      "assistant  thinking…",
      Style::default().fg(Color::DarkGray),
    )));
  }

  // Pin to the bottom; `scroll` counts lines back up from there.
  let bottom = row_count(lines.len()).saturating_sub(inner.height);
  app.max_scroll = bottom;
  app.page_height = inner.height.max(1);
  app.scroll = app.scroll.min(bottom);
  let offset = bottom - app.scroll;

  f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
}

fn message_lines(message: &ChatMessage, width: usize, out: &mut Vec<Line<'static>>) {
  let (label, colour) = match message.role {
    Role::User => ("you", Color::Cyan),
    Role::Assistant => ("assistant", Color::Green),
  };
  out.push(Line::from(Span::styled(
    label,
    Style::default().fg(colour).add_modifier(Modifier::BOLD),
  )));

  for step in &message.trace {
    for row in wrap(&trace_line(step), width) {
      out.push(Line::from(Span::styled(
        row,
        Style::default().fg(Color::DarkGray),
      )));
    }
  }

  for row in wrap(&message.content, width) {
    out.push(Line::from(row));
  }
}

fn trace_line(step: &AgentStep) -> String {
  let first = step.output.lines().next().unwrap_or("");
  let mut output: String = first.chars().take(TRACE_OUTPUT_CHARS).collect();
  if output.len() < step.output.len() {
    output.push('…');
  }
  if step.input.is_empty() {
    format!("  ↳ {} → {output}", step.tool)
  } else {
    format!("  ↳ {}: {} → {output}", step.tool, step.input)
  }
}

/// Paragraph scroll offsets are `u16`; longer transcripts pin at the cap.
fn row_count(lines: usize) -> u16 { u16::try_from(lines).unwrap_or(u16::MAX) }

/// Terminal columns taken by `c`, as ratatui measures it.
fn char_width(c: char) -> usize {
  let mut buf = [0; 4];
  Span::raw(&*c.encode_utf8(&mut buf)).width()
}

/// Hard-wrap `text` to `width` terminal columns, keeping explicit line
/// breaks. A character wider than the whole row gets a row of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
  let width = width.max(1);
  let mut rows = Vec::new();
  for line in text.split('\n') {
    let mut row = String::new();
    let mut used = 0;
    for c in line.chars() {
      let w = char_width(c);
      if used + w > width && !row.is_empty() {
        rows.push(std::mem::take(&mut row));
        used = 0;
      }
      row.push(c);
      used += w;
    }
    rows.push(row);
  }
  rows
}

// ─── Input ────────────────────────────────────────────────────────────────────

fn draw_input<A: Agent>(f: &mut Frame, area: Rect, app: &App<A>) {
  let border = if app.pending.is_some() { Color::DarkGray } else { Color::Cyan };
  let block = Block::default()
    .title(" Ask ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));
  let inner = block.inner(area);
  f.render_widget(block, area);

  // Keep the tail of a long question visible.
  let visible = inner.width.saturating_sub(1) as usize;
  let skip = app.input.chars().count().saturating_sub(visible);
  let shown: String = app.input.chars().skip(skip).collect();

  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::raw(shown),
      Span::styled("▏", Style::default().fg(Color::Cyan)),
    ])),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<A: Agent>(f: &mut Frame, area: Rect, app: &App<A>) {
  let mode_label = if app.pending.is_some() { "BUSY" } else { "READY" };
  let status = if app.status_msg.is_empty() {
    "Type a question  Enter send  PgUp/PgDn scroll  Ctrl-L clear  Esc quit".to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use ratatui::{Terminal, backend::TestBackend};

  use super::*;
  use crate::{agent::AgentReply, config::ChatConfig, error::Result};

  struct Silent;

  impl Agent for Silent {
    async fn ask(&self, _question: &str) -> Result<AgentReply> {
      Ok(AgentReply { answer: String::new(), steps: Vec::new() })
    }
  }

  #[test]
  fn wrap_splits_long_lines_and_keeps_breaks() {
    assert_eq!(wrap("abcdef", 4), ["abcd", "ef"]);
    assert_eq!(wrap("ab\n\ncd", 10), ["ab", "", "cd"]);
    assert_eq!(wrap("x", 0), ["x"]);
  }

  #[test]
  fn wrap_measures_display_width() {
    assert_eq!(wrap("日本語です", 4), ["日本", "語で", "す"]);
    assert_eq!(wrap("ab日", 3), ["ab", "日"]);
    assert_eq!(wrap("日", 1), ["日"]);
  }

  #[test]
  fn row_count_saturates() {
    assert_eq!(row_count(12), 12);
    assert_eq!(row_count(70_000), u16::MAX);
  }

  #[test]
  fn drawing_records_scroll_bounds() {
    let mut app = App::new(
      Arc::new(ChatConfig {
        api_key:       "sk-test".into(),
        model:         "gpt-4o-mini".into(),
        database_path: "data/database.db".into(),
        api_base:      "http://localhost".into(),
      }),
      Silent,
    );
    for i in 0..30 {
      app.session.push_user(format!("question {i}"));
    }
    app.scroll = 1_000;

    let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
    terminal.draw(|f| draw(f, &mut app)).unwrap();

    // 20 rows less header, input box, status bar and the two borders.
    assert_eq!(app.page_height, 13);
    // Greeting plus 30 questions, each a label, a line and a spacer.
    assert_eq!(app.max_scroll, 31 * 3 - 13);
    assert_eq!(app.scroll, app.max_scroll);
  }

  #[test]
  fn trace_line_truncates_output() {
    let step = AgentStep {
      tool:   "sql_db_query".into(),
      input:  "SELECT name FROM customers".into(),
      output: "name\nAlice\nBob".into(),
    };
    assert_eq!(
      trace_line(&step),
      "  ↳ sql_db_query: SELECT name FROM customers → name…"
    );

    let listed = AgentStep {
      tool:   "sql_db_list_tables".into(),
      input:  String::new(),
      output: "customers, orders".into(),
    };
    assert_eq!(trace_line(&listed), "  ↳ sql_db_list_tables → customers, orders");
  }
}

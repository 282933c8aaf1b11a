//! `sqlagent` — ask questions about a SQLite database in plain English.
//!
//! # Usage
//!
//! ```
//! sqlagent --api-key sk-... --database data/database.db
//! sqlagent --config ~/.config/sqlagent/chat.toml --log-file sqlagent.log
//! ```

mod agent;
mod app;
mod config;
mod error;
mod session;
mod ui;

use std::{
  fs::File,
  io,
  path::PathBuf,
  sync::{Arc, Mutex},
  time::Duration,
};

use agent::{SqlAgent, openai::OpenAiClient};
use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use config::{ArgValues, ConfigFile};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "sqlagent", about = "Chat with a SQLite database through an LLM")]
struct Args {
  /// Path to a TOML config file (api_key, model, database, api_base).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// OpenAI API key.
  #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// Chat model name (default: gpt-4o-mini).
  #[arg(long, env = "SQLAGENT_MODEL")]
  model: Option<String>,

  /// Database file, as a path or a sqlite:/// URI (default: data/database.db).
  /// Same variable as `populate` reads.
  #[arg(long, env = "SQLAGENT_DATABASE_PATH")]
  database: Option<String>,

  /// Base URL of an OpenAI-compatible API.
  #[arg(long, env = "SQLAGENT_API_BASE")]
  api_base: Option<String>,

  /// Write logs to this file. The terminal is taken over by the UI, so logs
  /// are discarded unless this is set.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    let file = File::create(path)
      .with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .with_writer(Mutex::new(file))
      .with_ansi(false)
      .init();
  }

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let config = Arc::new(config::resolve(
    ArgValues {
      api_key:  args.api_key,
      model:    args.model,
      database: args.database,
      api_base: args.api_base,
    },
    file_cfg,
  ));
  tracing::info!(
    model = %config.model,
    database = %config.database_path.display(),
    "starting chat session"
  );

  let client = OpenAiClient::new(Arc::clone(&config)).context("building HTTP client")?;
  let agent = SqlAgent::new(client, config.database_path.clone());
  let mut app = App::new(Arc::clone(&config), agent);

  if !config.database_path.exists() {
    tracing::warn!(path = %config.database_path.display(), "database file not found");
    app.status_msg = format!(
      "Database {} not found; run `populate` first.",
      config.database_path.display()
    );
  }

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<A: agent::Agent>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<A>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // A question queued on the previous pass is sent only after the frame
    // showing it has been drawn.
    if app.pending.is_some() {
      app.process_pending().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Resize and everything else just trigger a redraw.
      _ => {}
    }
  }

  Ok(())
}

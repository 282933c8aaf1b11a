//! Chat shell configuration.

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_DATABASE: &str = "data/database.db";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Settings for one chat session. Built once at startup and shared
/// read-only with every component that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
  pub api_key:       String,
  pub model:         String,
  pub database_path: PathBuf,
  pub api_base:      String,
}

impl ChatConfig {
  pub fn has_api_key(&self) -> bool { !self.api_key.trim().is_empty() }
}

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
pub struct ConfigFile {
  #[serde(default)]
  pub api_key:  String,
  #[serde(default)]
  pub model:    String,
  #[serde(default)]
  pub database: String,
  #[serde(default)]
  pub api_base: String,
}

/// Values from flags or their environment fallbacks.
#[derive(Debug, Default)]
pub struct ArgValues {
  pub api_key:  Option<String>,
  pub model:    Option<String>,
  pub database: Option<String>,
  pub api_base: Option<String>,
}

fn pick(arg: Option<String>, file: String, default: &str) -> String {
  arg
    .filter(|s| !s.is_empty())
    .or_else(|| (!file.is_empty()).then_some(file))
    .unwrap_or_else(|| default.to_string())
}

/// Accept either a bare path or a `sqlite:///path` URI.
pub fn database_path(raw: &str) -> PathBuf {
  PathBuf::from(raw.strip_prefix("sqlite:///").unwrap_or(raw))
}

/// Flags override the config file, which overrides defaults.
pub fn resolve(args: ArgValues, file: ConfigFile) -> ChatConfig {
  ChatConfig {
    api_key:       pick(args.api_key, file.api_key, ""),
    model:         pick(args.model, file.model, DEFAULT_MODEL),
    database_path: database_path(&pick(args.database, file.database, DEFAULT_DATABASE)),
    api_base:      pick(args.api_base, file.api_base, DEFAULT_API_BASE),
  }
}

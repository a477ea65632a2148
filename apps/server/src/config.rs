//! Server configuration from environment variables.

use std::path::PathBuf;

/// Default bank file, relative to the working directory.
pub const DEFAULT_BANK_PATH: &str = "database.md";

#[derive(Debug, Clone)]
pub struct Config {
    /// Markdown files merged, in order, into one bank.
    pub bank_paths: Vec<PathBuf>,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `QUIZ_BANK_PATHS`: comma-separated bank files (default `database.md`)
    /// - `QUIZ_DB_PATH`: SQLite progress database
    /// - `HOST` / `PORT`: listen address (default `0.0.0.0:3000`)
    pub fn from_env() -> anyhow::Result<Self> {
        let bank_paths = std::env::var("QUIZ_BANK_PATHS")
            .map(|raw| parse_bank_paths(&raw))
            .unwrap_or_else(|_| vec![PathBuf::from(DEFAULT_BANK_PATH)]);

        let db_path = std::env::var("QUIZ_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_db_path());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {raw:?}: {e}"))?,
            Err(_) => 3000,
        };

        Ok(Self {
            bank_paths,
            db_path,
            host,
            port,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bank_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quiz-runner")
        .join("progress.db")
}

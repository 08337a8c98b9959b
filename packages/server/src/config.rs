use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL; the in-memory store is used when unset
    pub database_url: Option<String>,
    pub port: u16,
    /// Default answer-service key; requests may supply their own
    pub perplexity_api_key: Option<String>,
    pub perplexity_model: String,
    pub perplexity_timeout_secs: u64,
    pub research_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: non_empty_var("DATABASE_URL"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            perplexity_api_key: non_empty_var("PERPLEXITY_API_KEY"),
            perplexity_model: non_empty_var("PERPLEXITY_MODEL")
                .unwrap_or_else(|| research::DEFAULT_MODEL.to_string()),
            perplexity_timeout_secs: env::var("PERPLEXITY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .context("PERPLEXITY_TIMEOUT_SECS must be a whole number of seconds")?,
            research_concurrency: env::var("RESEARCH_CONCURRENCY")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .context("RESEARCH_CONCURRENCY must be a positive number")?,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

use crate::error::{MovieError, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_OMDB_BASE: &str = "https://www.omdbapi.com/";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";

/// Search terms used to assemble the "popular movies" list.
pub const CURATED_SEED_TERMS: [&str; 10] = [
    "Avengers",
    "Batman",
    "Spider-Man",
    "Star Wars",
    "Harry Potter",
    "Marvel",
    "Fast",
    "Mission Impossible",
    "James Bond",
    "Jurassic",
];

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl OmdbConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(30),
            user_agent: format!("movie-explorer/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OMDB_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MovieError::Config("OMDB_API_KEY not set".to_string()))?;
        let base_url = env::var("OMDB_BASE_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OMDB_BASE.to_string());
        Ok(Self::new(base_url, api_key))
    }
}

#[derive(Debug, Clone)]
pub struct CuratedListConfig {
    pub seed_terms: Vec<String>,
    /// How many of `seed_terms` are actually queried.
    pub term_limit: usize,
    pub per_term: usize,
    pub max_results: usize,
    pub delay: Duration,
}

impl Default for CuratedListConfig {
    fn default() -> Self {
        Self {
            seed_terms: CURATED_SEED_TERMS.iter().map(|t| t.to_string()).collect(),
            term_limit: 4,
            per_term: 3,
            max_results: 20,
            delay: Duration::from_millis(100),
        }
    }
}

impl CuratedListConfig {
    pub fn active_terms(&self) -> &[String] {
        let end = self.term_limit.min(self.seed_terms.len());
        &self.seed_terms[..end]
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let raw = env::var("MOVIE_EXPLORER_ADDR")
            .ok()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let addr = raw
            .trim()
            .parse()
            .map_err(|e| MovieError::Config(format!("invalid MOVIE_EXPLORER_ADDR '{raw}': {e}")))?;
        Ok(Self { addr })
    }
}

use anyhow::{Context, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Mock,
    Rest,
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Mode::Mock),
            "rest" => Ok(Mode::Rest),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'mock' or 'rest'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    /// User the session provider reports as signed in. Absent means the
    /// process starts unauthenticated (mock mode falls back to a demo user).
    pub session_user_id: Option<String>,
    pub backend_base_url: String,
    pub backend_api_key: String,
    pub backend_api_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mode: Mode = env::var("MODE")
            .unwrap_or_else(|_| "mock".to_string())
            .parse()?;

        let backend_base_url =
            env::var("BACKEND_BASE_URL").unwrap_or_else(|_| "https://localhost:8443".to_string());
        Url::parse(&backend_base_url)
            .with_context(|| format!("Invalid BACKEND_BASE_URL: {}", backend_base_url))?;

        let backend_api_key = env::var("BACKEND_API_KEY").unwrap_or_default();
        let backend_api_secret = env::var("BACKEND_API_SECRET").unwrap_or_default();

        if mode == Mode::Rest && (backend_api_key.is_empty() || backend_api_secret.is_empty()) {
            anyhow::bail!("MODE=rest requires BACKEND_API_KEY and BACKEND_API_SECRET");
        }

        let session_user_id = env::var("SESSION_USER_ID").ok().filter(|s| !s.is_empty());

        Ok(Self {
            mode,
            session_user_id,
            backend_base_url,
            backend_api_key,
            backend_api_secret,
        })
    }
}

//! Client configuration
//!
//! The backend base URL is injected at construction time rather than read
//! from a module-wide constant, so tests can point the client at a mock
//! endpoint.

use std::env;

/// Default agent API base path on the local backend
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/agents";

/// Model identifier for the Gemini-backed LLM preset
pub const MODEL_GEMINI: &str = "gemini";

/// Model identifier for the Groq-backed LLM preset
pub const MODEL_GROQ: &str = "groq";

/// Model marker asking the backend to pick a provider itself
pub const MODEL_AUTO: &str = "auto";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the agent endpoints, without a trailing slash
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read configuration from the environment, falling back to the local
    /// backend default. `dotenv` is expected to have run already.
    pub fn from_env() -> Self {
        let base_url =
            env::var("AGENT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

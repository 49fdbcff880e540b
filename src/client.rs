//! HTTP client for the agent backend
//!
//! One function per logical operation against `<base_url>/{research,
//! sentiment, portfolio, llm}`. Each call is a single round-trip: no
//! retries, no timeout, no caching. Uses a long-lived reqwest::Client for
//! connection pooling.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};

use crate::config::{ClientConfig, MODEL_GEMINI, MODEL_GROQ};
use crate::error::{ClientError, Result};
use crate::models::{
    LlmRequest, LlmResponse, PortfolioRequest, ResearchRequest, ResearchResponse,
    SentimentRequest,
};

/// Reusable agent backend client (connection-pooled)
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(config: &ClientConfig) -> Self {
        let http = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Single POST round-trip shared by all operations. Non-2xx becomes a
    /// transport error carrying the operation name and status; the parsed
    /// body is otherwise returned to the caller uninterpreted.
    async fn post<B, T>(&self, operation: &str, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        info!("Calling agent backend: POST {}", url);

        let response = self.http.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            error!("{} request failed with status {}", operation, status);
            return Err(ClientError::transport(operation, status.as_u16()));
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            error!("Failed to parse {} response: {}", operation, e);
            ClientError::Application(format!("{} response parse error: {}", operation, e))
        })?;

        Ok(parsed)
    }

    // =============================
    // Logical Operations
    // =============================

    /// Run the multi-step research workflow for one ticker
    pub async fn research(&self, ticker: &str, query: Option<&str>) -> Result<ResearchResponse> {
        let request = ResearchRequest {
            ticker: ticker.to_string(),
            query: query.map(str::to_string),
        };
        self.post("Research", "research", &request).await
    }

    /// Batch sentiment scoring; the response is not interpreted client-side
    pub async fn sentiment(
        &self,
        texts: Vec<String>,
        sources: Option<Vec<String>>,
    ) -> Result<serde_json::Value> {
        let request = SentimentRequest { texts, sources };
        self.post("Sentiment", "sentiment", &request).await
    }

    /// Portfolio analysis; the response is not interpreted client-side
    pub async fn portfolio(
        &self,
        tickers: Vec<String>,
        watchlist_id: Option<String>,
    ) -> Result<serde_json::Value> {
        let request = PortfolioRequest {
            tickers,
            watchlist_id,
        };
        self.post("Portfolio", "portfolio", &request).await
    }

    /// Generic LLM proxy with an explicit model identifier
    pub async fn llm(&self, model: &str, prompt: &str) -> Result<LlmResponse> {
        let request = LlmRequest {
            model: model.to_string(),
            prompt: prompt.to_string(),
        };
        self.post("LLM", "llm", &request).await
    }

    /// LLM preset pinned to the Gemini provider
    pub async fn gemini(&self, prompt: &str) -> Result<LlmResponse> {
        self.llm(MODEL_GEMINI, prompt).await
    }

    /// LLM preset pinned to the Groq provider
    pub async fn groq(&self, prompt: &str) -> Result<LlmResponse> {
        self.llm(MODEL_GROQ, prompt).await
    }
}

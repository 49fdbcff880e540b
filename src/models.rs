//! Core data models for the research agent client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

//
// ================= Messages =================
//

/// Closed set of message kinds the UI layer discriminates on.
///
/// Backend-supplied step categories do not widen this enum; they travel in
/// [`Message::label`] as free text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Agent,
    Error,
    Step,
}

/// One entry in the append-only conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Strictly increasing per conversation
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
    /// Display label for backend step categories (e.g. "tool", "indicator")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub content: String,
}

//
// ================= Steps =================
//

/// One unit of backend-reported reasoning/tool output within a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Ordered chart points; field names are given by `x_key`/`y_key`
    #[serde(
        rename = "chartData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chart_data: Option<Vec<serde_json::Value>>,
    #[serde(rename = "xKey", default, skip_serializing_if = "Option::is_none")]
    pub x_key: Option<String>,
    #[serde(rename = "yKey", default, skip_serializing_if = "Option::is_none")]
    pub y_key: Option<String>,
}

//
// ================= Request Payloads =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub ticker: String,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRequest {
    pub texts: Vec<String>,
    pub sources: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    pub tickers: Vec<String>,
    pub watchlist_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    pub prompt: String,
}

//
// ================= Response Envelopes =================
//

/// Research response body; every field the reducer consumes is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ResearchData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchData {
    #[serde(default)]
    pub steps: Option<Vec<Step>>,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
}

/// Generic LLM response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

//! Financial Research Agent Client
//!
//! Client-side contract for the stock research agent backend:
//! - Typed API client for the research, sentiment, portfolio, and LLM-proxy
//!   endpoints (one round-trip per call, no retries)
//! - Ticker/query classifier routing free-form input to research or a
//!   generic LLM call
//! - Conversation state reducer: append-only message log, per-run steps
//!   list, and final answer slot
//! - Run state machine with stale-run protection
//! - Transcript PDF export
//!
//! FLOW:
//! INPUT → CLASSIFY → REQUEST → REDUCE → RENDER

pub mod classifier;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod export;
pub mod models;
pub mod session;

pub use error::{ClientError, Result};

// Re-export common types
pub use classifier::{QueryClassifier, Route};
pub use client::AgentClient;
pub use config::ClientConfig;
pub use conversation::Conversation;
pub use models::*;
pub use session::{ChatSession, RunOutcome};

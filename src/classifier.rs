//! Ticker/Query Classifier
//!
//! Decides whether free-form user input names a stock ticker (routed to the
//! research operation) or is a general question (routed to the generic LLM
//! operation with the "auto" model marker).

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::MODEL_AUTO;

/// Query substituted when a ticker is named with no trailing question
pub const DEFAULT_RESEARCH_QUERY: &str = "Provide a comprehensive analysis";

lazy_static! {
    /// Exchange-qualified symbol, e.g. RELIANCE.NS or TATASTEEL.BO
    static ref TICKER_PATTERN: Regex =
        Regex::new(r"(?i)\b[A-Z]{1,12}\.(?:NS|BO)\b").expect("valid ticker pattern");

    /// "analyze <TICKER>" phrase; the symbol may omit the exchange suffix
    static ref ANALYZE_PATTERN: Regex =
        Regex::new(r"(?i)\banalyze\s+([A-Z]{1,12}(?:\.(?:NS|BO))?)\b")
            .expect("valid analyze pattern");
}

/// Where a piece of user input should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Named a ticker; goes to the research operation
    Research { ticker: String, query: String },
    /// General question; goes to the generic LLM operation
    General { model: String, prompt: String },
}

/// Query classifier
pub struct QueryClassifier;

impl QueryClassifier {
    /// Classify raw input into a research or general-LLM route.
    ///
    /// The exchange-suffix recognizer runs first and short-circuits the
    /// analyze-phrase recognizer; the ordering is load-bearing for
    /// deterministic routing of inputs matching both.
    pub fn classify(input: &str) -> Route {
        let input = input.trim();

        if let Some(matched) = TICKER_PATTERN.find(input) {
            let ticker = matched.as_str().to_uppercase();
            let query = remainder_or_default(input, matched.start(), matched.end());
            return Route::Research { ticker, query };
        }

        if let Some(captures) = ANALYZE_PATTERN.captures(input) {
            let full = captures.get(0).expect("whole match");
            let ticker = captures
                .get(1)
                .expect("ticker capture")
                .as_str()
                .to_uppercase();
            let query = remainder_or_default(input, full.start(), full.end());
            return Route::Research { ticker, query };
        }

        Route::General {
            model: MODEL_AUTO.to_string(),
            prompt: input.to_string(),
        }
    }
}

/// Input with the matched span removed and trimmed; empty falls back to the
/// default research query.
fn remainder_or_default(input: &str, start: usize, end: usize) -> String {
    let remainder = format!("{} {}", input[..start].trim(), input[end..].trim());
    let remainder = remainder.trim();

    if remainder.is_empty() {
        DEFAULT_RESEARCH_QUERY.to_string()
    } else {
        remainder.to_string()
    }
}

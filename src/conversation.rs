//! Conversation state reducer
//!
//! Append-only message log plus the per-run steps list and final answer
//! slot. Pure sequencing over response envelopes; no network access and no
//! business logic beyond field selection.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::ClientError;
use crate::models::{LlmResponse, Message, MessageKind, ResearchResponse, Step};

/// Fallback content when an LLM response signals failure without detail
const LLM_FALLBACK_ERROR: &str = "Agent request failed";

/// Agent notice when a successful research run carried no summary fields
const NO_SUMMARY_NOTICE: &str = "No summary available for this run.";

/// Conversation state for one session
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    steps: Vec<Step>,
    final_answer: Option<String>,
    /// Collapsed step indices; absent means expanded
    collapsed: HashSet<usize>,
    next_message_id: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    // =============================
    // Append Operations
    // =============================

    /// Append a user message. Callers reject blank input before this point;
    /// the reducer appends unconditionally.
    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(MessageKind::User, None, content.into())
    }

    /// Append a step entry to the log. Used by presentation layers that
    /// inline backend step output into the transcript; `label` carries the
    /// backend's step category as display text.
    pub fn push_step(
        &mut self,
        label: impl Into<String>,
        content: impl Into<String>,
    ) -> &Message {
        self.push(MessageKind::Step, Some(label.into()), content.into())
    }

    fn push_agent(&mut self, content: String) -> &Message {
        self.push(MessageKind::Agent, None, content)
    }

    fn push_error(&mut self, content: String) -> &Message {
        self.push(MessageKind::Error, None, content)
    }

    fn push(&mut self, kind: MessageKind, label: Option<String>, content: String) -> &Message {
        let id = self.next_message_id;
        self.next_message_id += 1;

        self.messages.push(Message {
            id,
            timestamp: Utc::now(),
            kind,
            label,
            content,
        });

        self.messages.last().expect("just pushed")
    }

    // =============================
    // Run Lifecycle
    // =============================

    /// Clear the per-run slots. Steps and the final answer belong to exactly
    /// one run; a new run clears both before its request is issued.
    pub fn begin_run(&mut self) {
        self.steps.clear();
        self.final_answer = None;
        self.collapsed.clear();
    }

    /// Fold a research response into the conversation.
    ///
    /// Steps are replaced wholesale in the order received. Exactly one agent
    /// message is appended: from `ai_summary` (or `summary` as fallback,
    /// which also sets the final answer), else from joined `recommendations`,
    /// else a fixed no-summary notice.
    pub fn apply_research(&mut self, response: &ResearchResponse) {
        let Some(data) = response.data.as_ref() else {
            self.push_agent(NO_SUMMARY_NOTICE.to_string());
            return;
        };

        if let Some(steps) = data.steps.as_ref() {
            self.steps = steps.clone();
        }

        if let Some(summary) = data.ai_summary.as_ref().or(data.summary.as_ref()) {
            self.final_answer = Some(summary.clone());
            self.push_agent(summary.clone());
        } else if let Some(recommendations) = data.recommendations.as_ref() {
            self.push_agent(format!(
                "**Recommendations:**\n{}",
                recommendations.join("\n")
            ));
        } else {
            self.push_agent(NO_SUMMARY_NOTICE.to_string());
        }
    }

    /// Fold a generic LLM response into the conversation
    pub fn apply_llm(&mut self, response: &LlmResponse) {
        match response.response.as_ref() {
            Some(answer) if response.success => {
                self.push_agent(answer.clone());
            }
            _ => {
                let content = response
                    .error
                    .clone()
                    .unwrap_or_else(|| LLM_FALLBACK_ERROR.to_string());
                self.push_error(content);
            }
        }
    }

    /// Record a failed request as a single error message
    pub fn apply_transport_failure(&mut self, err: &ClientError) {
        self.push_error(format!("Agent error: {}", err));
    }

    // =============================
    // Step Collapse State
    // =============================

    /// Toggle collapse for the step at `index`; toggling twice restores the
    /// original state. Default is expanded.
    pub fn toggle_step(&mut self, index: usize) {
        if !self.collapsed.remove(&index) {
            self.collapsed.insert(index);
        }
    }

    pub fn is_step_collapsed(&self, index: usize) -> bool {
        self.collapsed.contains(&index)
    }

    // =============================
    // Accessors
    // =============================

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.final_answer.as_deref()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

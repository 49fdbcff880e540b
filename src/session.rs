//! Chat session: one run at a time through classify → request → reduce
//!
//! Drives the `Idle → Sending → {Completed | Failed}` machine for each user
//! submission. Runs carry a monotonically increasing id; a result is applied
//! only while its run is still the latest, so a newer submission can never
//! have its steps or final answer clobbered by a stale response.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classifier::{QueryClassifier, Route};
use crate::client::AgentClient;
use crate::conversation::Conversation;
use crate::error::{ClientError, Result};

/// Outcome of one completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Response applied to the conversation
    Completed,
    /// Request failed; an error message was appended
    Failed,
    /// A newer run superseded this one; its result was discarded
    Superseded,
}

/// Conversational session against one agent backend
pub struct ChatSession {
    session_id: Uuid,
    client: AgentClient,
    conversation: Conversation,
    loading: bool,
    run_counter: u64,
    latest_run: u64,
}

impl ChatSession {
    pub fn new(client: AgentClient) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            client,
            conversation: Conversation::new(),
            loading: false,
            run_counter: 0,
            latest_run: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn client(&self) -> &AgentClient {
        &self.client
    }

    /// Submit one piece of user input and drive the run to completion.
    ///
    /// Blank input is rejected before anything is appended to the log.
    /// Transport failures become one error message; they never propagate.
    pub async fn submit(&mut self, input: &str) -> Result<RunOutcome> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ClientError::InvalidInput(
                "message must not be blank".to_string(),
            ));
        }

        self.conversation.push_user(input);

        self.run_counter += 1;
        let run = self.run_counter;
        self.latest_run = run;
        self.loading = true;
        self.conversation.begin_run();

        let route = QueryClassifier::classify(input);
        info!(session = %self.session_id, run, "Dispatching {:?}", route);

        let outcome = match route {
            Route::Research { ticker, query } => {
                match self.client.research(&ticker, Some(&query)).await {
                    Ok(response) => {
                        if self.is_stale(run) {
                            RunOutcome::Superseded
                        } else {
                            self.conversation.apply_research(&response);
                            RunOutcome::Completed
                        }
                    }
                    Err(e) => self.fail(run, e),
                }
            }
            Route::General { model, prompt } => {
                match self.client.llm(&model, &prompt).await {
                    Ok(response) => {
                        if self.is_stale(run) {
                            RunOutcome::Superseded
                        } else {
                            self.conversation.apply_llm(&response);
                            RunOutcome::Completed
                        }
                    }
                    Err(e) => self.fail(run, e),
                }
            }
        };

        // Only the latest run may clear the loading flag; it was applied (or
        // failed) above before this point.
        if self.latest_run == run {
            self.loading = false;
        }

        Ok(outcome)
    }

    fn is_stale(&self, run: u64) -> bool {
        if self.latest_run != run {
            debug!(run, latest = self.latest_run, "Discarding stale run result");
            true
        } else {
            false
        }
    }

    fn fail(&mut self, run: u64, err: ClientError) -> RunOutcome {
        if self.is_stale(run) {
            return RunOutcome::Superseded;
        }

        warn!(session = %self.session_id, run, "Run failed: {}", err);
        self.conversation.apply_transport_failure(&err);
        RunOutcome::Failed
    }
}

mod common;

use common::MockBackend;
use financial_research_client::{
    AgentClient, ChatSession, ClientConfig, ClientError, MessageKind, RunOutcome,
};
use serde_json::json;

async fn session_for(backend: MockBackend) -> ChatSession {
    let base_url = common::spawn(backend).await;
    ChatSession::new(AgentClient::new(&ClientConfig::new(base_url)))
}

#[tokio::test]
async fn ticker_input_runs_research_and_populates_run_state() {
    let backend = MockBackend::default();
    backend.set_research_reply(json!({
        "success": true,
        "data": {
            "steps": [
                {"type": "fetch", "content": "downloaded 90 days of prices"},
                {"type": "indicator", "content": "RSI 62.4, MA20 rising"}
            ],
            "ai_summary": "Momentum looks healthy."
        }
    }));
    let mut session = session_for(backend.clone()).await;

    let outcome = session
        .submit("RELIANCE.NS describe the company")
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert!(!session.is_loading());

    let conversation = session.conversation();
    assert_eq!(conversation.steps().len(), 2);
    assert_eq!(conversation.final_answer(), Some("Momentum looks healthy."));

    let last = conversation.last_message().unwrap();
    assert_eq!(last.kind, MessageKind::Agent);
    assert_eq!(last.content, "Momentum looks healthy.");

    // The classifier stripped the ticker out of the query text
    let recorded = backend.recorded();
    assert_eq!(recorded[0].0, "research");
    assert_eq!(recorded[0].1["ticker"], "RELIANCE.NS");
    assert_eq!(recorded[0].1["query"], "describe the company");
}

#[tokio::test]
async fn general_question_routes_to_llm_with_auto_model() {
    let backend = MockBackend::default();
    backend.set_llm_reply(json!({
        "success": true,
        "model": "gemini",
        "response": "RSI measures momentum."
    }));
    let mut session = session_for(backend.clone()).await;

    let outcome = session.submit("what is RSI?").await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    let recorded = backend.recorded();
    assert_eq!(recorded[0].0, "llm");
    assert_eq!(recorded[0].1["model"], "auto");
    assert_eq!(recorded[0].1["prompt"], "what is RSI?");

    let last = session.conversation().last_message().unwrap();
    assert_eq!(last.kind, MessageKind::Agent);
    assert_eq!(last.content, "RSI measures momentum.");
}

#[tokio::test]
async fn llm_failure_body_becomes_error_message() {
    let backend = MockBackend::default();
    backend.set_llm_reply(json!({"success": false, "error": "rate limited"}));
    let mut session = session_for(backend).await;

    let outcome = session.submit("what is a P/E ratio?").await.unwrap();

    // The run itself completed; the failure lives in the message log.
    assert_eq!(outcome, RunOutcome::Completed);
    let last = session.conversation().last_message().unwrap();
    assert_eq!(last.kind, MessageKind::Error);
    assert_eq!(last.content, "rate limited");
}

#[tokio::test]
async fn transport_failure_appends_one_error_and_clears_loading() {
    let backend = MockBackend::default();
    backend.fail_with(500);
    let mut session = session_for(backend).await;

    let outcome = session.submit("analyze TCS").await.unwrap();

    assert_eq!(outcome, RunOutcome::Failed);
    assert!(!session.is_loading());

    let conversation = session.conversation();
    // Exactly two entries: the user message and one error message.
    assert_eq!(conversation.message_count(), 2);
    assert_eq!(conversation.messages()[0].kind, MessageKind::User);

    let last = conversation.last_message().unwrap();
    assert_eq!(last.kind, MessageKind::Error);
    assert_eq!(last.content, "Agent error: Research error: 500");

    assert!(conversation.steps().is_empty());
    assert!(conversation.final_answer().is_none());
}

#[tokio::test]
async fn blank_input_is_rejected_before_any_mutation() {
    let backend = MockBackend::default();
    let mut session = session_for(backend.clone()).await;

    let err = session.submit("   ").await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));

    assert_eq!(session.conversation().message_count(), 0);
    assert!(!session.is_loading());
    assert!(backend.recorded().is_empty());
}

#[tokio::test]
async fn analyze_phrase_defaults_the_query() {
    let backend = MockBackend::default();
    backend.set_research_reply(json!({
        "success": true,
        "data": {"ai_summary": "TCS overview."}
    }));
    let mut session = session_for(backend.clone()).await;

    session.submit("analyze TCS").await.unwrap();

    let recorded = backend.recorded();
    assert_eq!(recorded[0].1["ticker"], "TCS");
    assert_eq!(recorded[0].1["query"], "Provide a comprehensive analysis");
}

#[tokio::test]
async fn new_run_clears_previous_steps_and_answer() {
    let backend = MockBackend::default();
    backend.set_research_reply(json!({
        "success": true,
        "data": {
            "steps": [{"type": "fetch", "content": "prices"}],
            "ai_summary": "First answer."
        }
    }));
    let mut session = session_for(backend.clone()).await;

    session.submit("RELIANCE.NS").await.unwrap();
    assert_eq!(session.conversation().steps().len(), 1);

    // Second run returns no steps; the stale ones must not survive.
    backend.set_research_reply(json!({
        "success": true,
        "data": {"ai_summary": "Second answer."}
    }));
    session.submit("TCS.NS").await.unwrap();

    assert!(session.conversation().steps().is_empty());
    assert_eq!(session.conversation().final_answer(), Some("Second answer."));
}

#[tokio::test]
async fn research_without_summary_fields_appends_notice() {
    let backend = MockBackend::default();
    backend.set_research_reply(json!({"success": true, "data": {}}));
    let mut session = session_for(backend).await;

    session.submit("INFY.NS").await.unwrap();

    let last = session.conversation().last_message().unwrap();
    assert_eq!(last.kind, MessageKind::Agent);
    assert_eq!(last.content, "No summary available for this run.");
}

#[tokio::test]
async fn recommendations_are_joined_into_one_agent_message() {
    let backend = MockBackend::default();
    backend.set_research_reply(json!({
        "success": true,
        "data": {"recommendations": ["Buy", "Hold"]}
    }));
    let mut session = session_for(backend).await;

    session.submit("WIPRO.BO").await.unwrap();

    let last = session.conversation().last_message().unwrap();
    assert_eq!(last.content, "**Recommendations:**\nBuy\nHold");
}

use std::sync::Arc;
use std::time::Duration;

use super::AssistantSession;
use crate::domain::models::AssistantError;
use crate::domain::models::Transcript;
use crate::domain::models::TranscriptTurn;
use crate::domain::services::mock_backend::MockBackend;
use crate::domain::services::mock_backend::MockReply;

fn session(backend: &MockBackend, history_limit: usize) -> AssistantSession {
    return AssistantSession::new(
        Arc::new(backend.clone()),
        Duration::from_millis(200),
        history_limit,
    );
}

#[tokio::test]
async fn it_returns_reply_text() {
    let backend = MockBackend::new(MockReply::Text("It may mean infection.".to_string()));
    let history = Transcript::seeded("Hi");

    let res = session(&backend, 0)
        .send_message("What does high WBC mean?", &history)
        .await;

    assert_eq!(res, Ok("It may mean infection.".to_string()));

    let prompts = backend.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].text, "What does high WBC mean?");
    assert_eq!(prompts[0].history, history);
}

#[tokio::test]
async fn it_maps_backend_failures_to_unavailable() {
    let backend = MockBackend::new(MockReply::NetworkError);

    let res = session(&backend, 0)
        .send_message("Hi", &Transcript::default())
        .await;

    assert_eq!(res, Err(AssistantError::Unavailable));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn it_times_out_as_unavailable() {
    let backend = MockBackend::new(MockReply::Hang);

    let res = session(&backend, 0)
        .send_message("Hi", &Transcript::default())
        .await;

    assert_eq!(res, Err(AssistantError::Unavailable));
}

#[tokio::test]
async fn it_does_not_call_backend_for_empty_text() {
    let backend = MockBackend::new(MockReply::Text("unused".to_string()));

    let res = session(&backend, 0)
        .send_message("   ", &Transcript::default())
        .await;

    assert_eq!(res, Err(AssistantError::Unavailable));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn it_sends_windowed_history() {
    let backend = MockBackend::new(MockReply::Text("ok".to_string()));
    let mut history = Transcript::seeded("Hi");
    history.push_exchange("a", "b");
    history.push_exchange("c", "d");

    let res = session(&backend, 2).send_message("e", &history).await;
    assert!(res.is_ok());

    let prompts = backend.prompts.lock().unwrap();
    assert_eq!(
        prompts[0].history.turns(),
        &[TranscriptTurn::user("c"), TranscriptTurn::model("d")]
    );
    assert_eq!(history.len(), 6);
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task;
use tokio::time;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::AssistantError;
use crate::domain::models::BackendPrompt;
use crate::domain::models::Event;
use crate::domain::models::Transcript;
use crate::domain::services::mock_backend::MockBackend;
use crate::domain::services::mock_backend::MockReply;
use crate::domain::services::AssistantSession;

fn spawn_service(
    backend: &MockBackend,
) -> (
    mpsc::UnboundedSender<Action>,
    mpsc::UnboundedReceiver<Event>,
    task::JoinHandle<Result<()>>,
) {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let assistant = AssistantSession::new(
        Arc::new(backend.clone()),
        Duration::from_secs(5),
        0,
    );

    let handle = tokio::spawn(async move {
        return ActionsService::start(assistant, event_tx, &mut action_rx).await;
    });

    return (action_tx, event_rx, handle);
}

fn prompt(text: &str) -> BackendPrompt {
    return BackendPrompt::new(text.to_string(), Transcript::seeded("Hi"));
}

fn to_res(event: Option<Event>) -> Result<Result<String, AssistantError>> {
    match event {
        Some(Event::AssistantAnswer(res)) => return Ok(res),
        _ => bail!("Wrong type from recv"),
    }
}

#[test]
fn it_lists_commands_in_help() {
    let text = super::help_text();
    assert!(text.starts_with("COMMANDS:"));
    assert!(text.contains("/attach (/at)"));
    assert!(text.contains("/logout"));
}

#[tokio::test]
async fn it_sends_completion_results() -> Result<()> {
    let backend = MockBackend::new(MockReply::Text("It may mean infection.".to_string()));
    let (tx, mut rx, _handle) = spawn_service(&backend);

    tx.send(Action::AskAssistant(prompt("What does high WBC mean?")))?;

    let res = to_res(rx.recv().await)?;
    assert_eq!(res, Ok("It may mean infection.".to_string()));
    assert_eq!(backend.calls(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_sends_unavailable_on_failure() -> Result<()> {
    let backend = MockBackend::new(MockReply::NetworkError);
    let (tx, mut rx, _handle) = spawn_service(&backend);

    tx.send(Action::AskAssistant(prompt("Hi")))?;

    let res = to_res(rx.recv().await)?;
    assert_eq!(res, Err(AssistantError::Unavailable));

    return Ok(());
}

#[tokio::test]
async fn it_drops_requests_while_one_is_in_flight() -> Result<()> {
    let backend = MockBackend::new(MockReply::Text("first".to_string()))
        .with_delay(Duration::from_millis(200));
    let (tx, mut rx, _handle) = spawn_service(&backend);

    tx.send(Action::AskAssistant(prompt("one")))?;
    tx.send(Action::AskAssistant(prompt("two")))?;

    let res = to_res(rx.recv().await)?;
    assert_eq!(res, Ok("first".to_string()));

    let extra = time::timeout(Duration::from_millis(300), rx.recv()).await;
    assert!(extra.is_err());
    assert_eq!(backend.calls(), 1);
    assert_eq!(backend.prompts.lock().unwrap()[0].text, "one");

    return Ok(());
}

#[tokio::test]
async fn it_aborts_in_flight_request() -> Result<()> {
    let backend = MockBackend::new(MockReply::Hang);
    let (tx, mut rx, _handle) = spawn_service(&backend);

    tx.send(Action::AskAssistant(prompt("Hi")))?;
    time::sleep(Duration::from_millis(50)).await;
    tx.send(Action::CancelQuestion())?;

    let res = to_res(rx.recv().await)?;
    assert_eq!(res, Err(AssistantError::Unavailable));

    return Ok(());
}

#[tokio::test]
async fn it_ignores_abort_when_idle() -> Result<()> {
    let backend = MockBackend::new(MockReply::Text("ok".to_string()));
    let (tx, mut rx, _handle) = spawn_service(&backend);

    time::sleep(Duration::from_millis(20)).await;
    tx.send(Action::CancelQuestion())?;

    let extra = time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(extra.is_err());

    return Ok(());
}

#[tokio::test]
async fn it_stops_when_actions_close() -> Result<()> {
    let backend = MockBackend::new(MockReply::Text("ok".to_string()));
    let (tx, _rx, handle) = spawn_service(&backend);

    drop(tx);
    let res = time::timeout(Duration::from_secs(1), handle).await??;
    assert!(res.is_ok());

    return Ok(());
}

//! Drive the event loop through whole rounds over real channels

use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tango_config::Config;
use tango_core::store::MemoryStore;
use tango_core::wordlist::parse_word_list;
use tango_core::{Session, UsageLedger, WeightedSampler};
use tango_types::{AppEvent, DrillMode, FaceView, NoticeLevel, TextSource};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::practice::Practice;
use crate::state::AppState;

const WORDS: &str = "1,cat,猫,\n2,dog,犬,\n";

struct Harness {
    state: Arc<AppState>,
    input: AsyncSender<AppEvent>,
    output: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
    task: JoinHandle<anyhow::Result<()>>,
}

fn spawn_loop(mode: DrillMode, deck_size: usize, store: MemoryStore) -> Harness {
    let mut config = Config::default();
    config.round.deck_size = deck_size;

    let mut session = Session::new(
        config.round.clone(),
        UsageLedger::open(store),
        WeightedSampler::seeded(21),
    );
    session.replace_pool(parse_word_list(WORDS).unwrap());

    let state = Arc::new(AppState::new(config));
    let (input, input_rx) = kanal::unbounded_async();
    let (output_tx, output) = kanal::unbounded_async();
    let cancel = CancellationToken::new();

    let task = tokio::spawn(event_loop(
        state.clone(),
        Practice::new(session, mode),
        input_rx,
        output_tx,
        cancel.clone(),
    ));

    Harness {
        state,
        input,
        output,
        cancel,
        task,
    }
}

async fn next(harness: &Harness) -> AppEvent {
    timeout(Duration::from_secs(2), harness.output.recv())
        .await
        .expect("timed out waiting for event")
        .expect("channel closed")
}

fn typed(text: &str) -> AppEvent {
    AppEvent::TextInput {
        text: text.to_string(),
        source: TextSource::Keyboard,
    }
}

fn answer_for(prompt: &str) -> &'static str {
    match prompt {
        "猫" => "cat",
        "犬" => "dog",
        other => panic!("unexpected prompt {other}"),
    }
}

async fn expect_prompt(harness: &Harness) -> String {
    match next(harness).await {
        AppEvent::ShowPrompt(prompt) => prompt.prompt,
        other => panic!("expected prompt, got {other:?}"),
    }
}

fn number_of(faces: &[FaceView], text: &str) -> usize {
    faces
        .iter()
        .find(|face| face.text == text)
        .map(|face| face.number)
        .expect("face present")
}

#[tokio::test]
async fn test_speak_round_to_completion() {
    let harness = spawn_loop(DrillMode::Speak, 2, MemoryStore::new());
    harness.input.send(AppEvent::StartRound).await.unwrap();

    let mut prompt = expect_prompt(&harness).await;
    assert!(matches!(
        next(&harness).await,
        AppEvent::ShowProgress { done: 0, total: 2, .. }
    ));

    harness.input.send(typed(answer_for(&prompt))).await.unwrap();
    match next(&harness).await {
        AppEvent::ShowFeedback(feedback) => {
            assert!(feedback.accepted);
            assert_eq!(feedback.result.accuracy, 100);
        }
        other => panic!("expected feedback, got {other:?}"),
    }
    assert!(matches!(
        next(&harness).await,
        AppEvent::ShowProgress { done: 1, total: 2, .. }
    ));

    prompt = expect_prompt(&harness).await;
    harness
        .input
        .send(typed(&answer_for(&prompt).to_uppercase()))
        .await
        .unwrap();
    assert!(matches!(next(&harness).await, AppEvent::ShowFeedback(_)));
    assert!(matches!(
        next(&harness).await,
        AppEvent::ShowProgress { done: 2, total: 2, .. }
    ));
    assert!(matches!(
        next(&harness).await,
        AppEvent::RoundFinished {
            mode: DrillMode::Speak
        }
    ));

    let stats = harness.state.status.practice.read().await.clone();
    assert_eq!(stats.attempts, 2);
    assert_eq!(stats.correct, 2);
    assert_eq!(stats.rounds_completed, 1);
}

#[tokio::test]
async fn test_miss_locks_input_until_resume() {
    let harness = spawn_loop(DrillMode::Speak, 2, MemoryStore::new());
    harness.input.send(AppEvent::StartRound).await.unwrap();

    let prompt = expect_prompt(&harness).await;
    next(&harness).await; // progress

    harness.input.send(typed("something else entirely")).await.unwrap();
    match next(&harness).await {
        AppEvent::ShowFeedback(feedback) => {
            assert!(!feedback.accepted);
            assert_eq!(feedback.expected, answer_for(&prompt));
        }
        other => panic!("expected feedback, got {other:?}"),
    }
    next(&harness).await; // progress

    // Ignored while the miss is on screen
    harness.input.send(typed(answer_for(&prompt))).await.unwrap();
    harness.input.send(AppEvent::ResumeAfterMiss).await.unwrap();

    assert_eq!(expect_prompt(&harness).await, prompt);

    let stats = harness.state.status.practice.read().await.clone();
    assert_eq!(stats.attempts, 1);
    assert_eq!(stats.correct, 0);
}

#[tokio::test]
async fn test_cancel_attempt_reprompts_without_grading() {
    let harness = spawn_loop(DrillMode::Speak, 2, MemoryStore::new());
    harness.input.send(AppEvent::StartRound).await.unwrap();

    let prompt = expect_prompt(&harness).await;
    next(&harness).await; // progress

    harness.input.send(AppEvent::CancelAttempt).await.unwrap();
    assert!(matches!(
        next(&harness).await,
        AppEvent::Notice {
            level: NoticeLevel::Info,
            ..
        }
    ));
    assert_eq!(expect_prompt(&harness).await, prompt);
    assert_eq!(harness.state.status.practice.read().await.attempts, 0);
}

#[tokio::test]
async fn test_match_round_with_one_mismatch() {
    let harness = spawn_loop(DrillMode::Match, 2, MemoryStore::new());
    harness.input.send(AppEvent::StartRound).await.unwrap();

    let faces = match next(&harness).await {
        AppEvent::ShowFaces(faces) => faces,
        other => panic!("expected faces, got {other:?}"),
    };
    assert_eq!(faces.len(), 4);
    next(&harness).await; // progress

    let wrong = format!("{} {}", number_of(&faces, "cat"), number_of(&faces, "犬"));
    harness.input.send(typed(&wrong)).await.unwrap();
    assert!(matches!(next(&harness).await, AppEvent::ShowFaces(_)));
    assert!(matches!(next(&harness).await, AppEvent::ShowMismatch));

    harness.input.send(AppEvent::ResumeAfterMiss).await.unwrap();
    match next(&harness).await {
        AppEvent::ShowFaces(faces) => assert!(faces.iter().all(|face| !face.selected)),
        other => panic!("expected faces, got {other:?}"),
    }

    let cat = format!("{},{}", number_of(&faces, "cat"), number_of(&faces, "猫"));
    harness.input.send(typed(&cat)).await.unwrap();
    assert!(matches!(
        next(&harness).await,
        AppEvent::Notice {
            level: NoticeLevel::Success,
            ..
        }
    ));
    assert!(matches!(
        next(&harness).await,
        AppEvent::ShowProgress { done: 1, .. }
    ));
    assert!(matches!(next(&harness).await, AppEvent::ShowFaces(_)));

    let dog = format!("{} {}", number_of(&faces, "犬"), number_of(&faces, "dog"));
    harness.input.send(typed(&dog)).await.unwrap();
    next(&harness).await; // match notice
    next(&harness).await; // progress
    assert!(matches!(
        next(&harness).await,
        AppEvent::RoundFinished {
            mode: DrillMode::Match
        }
    ));

    let stats = harness.state.status.practice.read().await.clone();
    assert_eq!(stats.attempts, 3);
    assert_eq!(stats.correct, 2);
}

#[tokio::test]
async fn test_short_list_reports_not_enough_words_and_stops() {
    let harness = spawn_loop(DrillMode::Speak, 5, MemoryStore::new());
    harness.input.send(AppEvent::StartRound).await.unwrap();

    match next(&harness).await {
        AppEvent::Notice {
            level: NoticeLevel::Error,
            message,
        } => assert!(message.contains("Not enough unique words (2)")),
        other => panic!("expected notice, got {other:?}"),
    }

    let result = timeout(Duration::from_secs(2), harness.task)
        .await
        .expect("loop did not stop");
    let err = result.unwrap().unwrap_err();
    assert!(err.to_string().contains("reset usage data"));
    assert!(!matches!(harness.output.try_recv(), Ok(Some(_))));
}

#[tokio::test]
async fn test_failed_save_is_reported_not_fatal() {
    let harness = spawn_loop(
        DrillMode::Speak,
        2,
        MemoryStore::new().with_failing_writes(),
    );
    harness.input.send(AppEvent::StartRound).await.unwrap();

    let prompt = expect_prompt(&harness).await;
    next(&harness).await; // progress

    harness.input.send(typed(answer_for(&prompt))).await.unwrap();
    match next(&harness).await {
        AppEvent::Notice {
            level: NoticeLevel::Error,
            message,
        } => assert!(message.starts_with("Progress could not be saved")),
        other => panic!("expected notice, got {other:?}"),
    }
    assert!(matches!(next(&harness).await, AppEvent::ShowFeedback(f) if f.accepted));
    assert_eq!(harness.state.status.practice.read().await.persist_failures, 1);
}

#[tokio::test]
async fn test_list_mode_shows_words() {
    let harness = spawn_loop(DrillMode::List, 10, MemoryStore::new());
    harness.input.send(AppEvent::StartRound).await.unwrap();

    match next(&harness).await {
        AppEvent::ShowWords(words) => {
            assert_eq!(words.len(), 2);
            assert_eq!(words[0].usage.used_count, 0);
        }
        other => panic!("expected words, got {other:?}"),
    }
}

#[tokio::test]
async fn test_shutdown_event_stops_loop() {
    let harness = spawn_loop(DrillMode::Speak, 2, MemoryStore::new());
    harness.input.send(AppEvent::Shutdown).await.unwrap();

    let result = timeout(Duration::from_secs(2), harness.task)
        .await
        .expect("loop did not stop");
    assert!(result.unwrap().is_ok());
    assert!(harness.cancel.is_cancelled());
}

use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tango_config::Config;
use tango_types::{AppEvent, DrillMode, FaceView, NoticeLevel, WordView};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Terminal front-end: renders engine events and drives the timed transitions
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    config: Arc<RwLock<Config>>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => event?,
        };

        match event {
            AppEvent::ShowPrompt(prompt) => {
                println!();
                println!("  {}", prompt.prompt);
                println!("  {}", prompt.instruction);
                if let Some(url) = prompt.voice_url {
                    println!("  (audio: {url})");
                }
            }
            AppEvent::ShowFeedback(feedback) => {
                if feedback.accepted {
                    println!("Correct! Accuracy: {}%", feedback.result.accuracy);
                } else {
                    println!(
                        "Incorrect. Accuracy: {}%. Try again.",
                        feedback.result.accuracy
                    );
                    if !feedback.result.missed_tokens.is_empty() {
                        println!("Missed: {}", feedback.result.missed_tokens.join(" "));
                    }
                    schedule_resume(&config, &ui_to_app_tx).await;
                }
            }
            AppEvent::ShowFaces(faces) => print_faces(&faces),
            AppEvent::ShowMismatch => {
                println!("No match. Try again!");
                schedule_resume(&config, &ui_to_app_tx).await;
            }
            AppEvent::ShowProgress { done, total, label } => {
                println!("{label}: {done}/{total}");
            }
            AppEvent::ShowWords(words) => {
                print_words(&words);
                cancel.cancel();
            }
            AppEvent::RoundFinished { mode } => {
                let auto_continue = config.read().await.round.auto_continue;
                if auto_continue && mode != DrillMode::List {
                    println!("Round Complete! Starting a new round...");
                    ui_to_app_tx.send(AppEvent::StartRound).await?;
                } else {
                    println!("Round Complete!");
                    ui_to_app_tx.send(AppEvent::Shutdown).await?;
                }
            }
            AppEvent::Notice { level, message } => match level {
                NoticeLevel::Info | NoticeLevel::Success => println!("{message}"),
                NoticeLevel::Error => eprintln!("{message}"),
            },
            AppEvent::TextInput { .. }
            | AppEvent::StartRound
            | AppEvent::CancelAttempt
            | AppEvent::ResumeAfterMiss
            | AppEvent::Shutdown => {}
        }
    }

    Ok(())
}

/// Unlock input after `match_delay_ms` without blocking rendering
async fn schedule_resume(config: &RwLock<Config>, ui_to_app_tx: &AsyncSender<AppEvent>) {
    let delay = Duration::from_millis(config.read().await.round.match_delay_ms);
    let tx = ui_to_app_tx.clone();

    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Err(e) = tx.send(AppEvent::ResumeAfterMiss).await {
            tracing::debug!("Resume not delivered: {}", e);
        }
    });
}

fn print_faces(faces: &[FaceView]) {
    println!();
    for face in faces {
        if face.cleared {
            println!("  {:>2}. ----", face.number);
        } else if face.selected {
            println!("  {:>2}. [{}]", face.number, face.text);
        } else {
            println!("  {:>2}. {}", face.number, face.text);
        }
    }
}

fn print_words(words: &[WordView]) {
    for view in words {
        println!(
            "{}. {} (Used: {}, Diff: {})",
            view.word.id,
            view.word.display_fields().join(" / "),
            view.usage.used_count,
            view.usage.difficulty
        );
    }
}

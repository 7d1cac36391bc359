use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tango_core::RoundError;
use tango_types::{AppEvent, NoticeLevel};
use tokio_util::sync::CancellationToken;

use crate::practice::Practice;
use crate::state::AppState;

pub mod cancel_attempt;
pub mod resume;
pub mod start_round;
pub mod text_input;

use cancel_attempt::handle_cancel_attempt;
use resume::handle_resume;
use start_round::handle_start_round;
use text_input::handle_text_input;

/// App's main loop. Owns the practice state and finishes one event before taking the next.
pub async fn event_loop(
    state: Arc<AppState>,
    mut practice: Practice,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Event loop started in {} mode", practice.mode);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("Event received: {:?}", std::mem::discriminant(&event));
        if matches!(event, AppEvent::Shutdown) {
            cancel.cancel();
            break;
        }

        handle_events(&state, &mut practice, &app_to_ui_tx, event).await?;
    }

    tracing::info!("Event loop stopping");
    Ok(())
}

async fn handle_events(
    state: &AppState,
    practice: &mut Practice,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::StartRound => {
            handle_start_round(practice, app_to_ui_tx).await?;
        }
        AppEvent::TextInput { text, source } => {
            tracing::debug!("TextInput from {:?}: {} chars", source, text.len());
            handle_text_input(state, practice, app_to_ui_tx, &text).await?;
        }
        AppEvent::CancelAttempt => {
            handle_cancel_attempt(practice, app_to_ui_tx).await?;
        }
        AppEvent::ResumeAfterMiss => {
            handle_resume(practice, app_to_ui_tx).await?;
        }
        AppEvent::Shutdown => {}
        AppEvent::ShowPrompt(_)
        | AppEvent::ShowFeedback(_)
        | AppEvent::ShowFaces(_)
        | AppEvent::ShowMismatch
        | AppEvent::ShowProgress { .. }
        | AppEvent::ShowWords(_)
        | AppEvent::RoundFinished { .. }
        | AppEvent::Notice { .. } => {
            // UI-only event, ignore in backend
        }
    }

    Ok(())
}

pub(crate) async fn notify(
    app_to_ui_tx: &AsyncSender<AppEvent>,
    level: NoticeLevel,
    message: impl Into<String>,
) -> anyhow::Result<()> {
    app_to_ui_tx
        .send(AppEvent::Notice {
            level,
            message: message.into(),
        })
        .await?;
    Ok(())
}

pub(crate) fn round_error_message(error: &RoundError) -> String {
    match error {
        RoundError::NotEnoughWords {
            available,
            required,
        } => format!(
            "Not enough unique words ({available}) to create {required} cards. \
             Please add more words or reset usage data."
        ),
        other => other.to_string(),
    }
}

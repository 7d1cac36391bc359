use kanal::AsyncSender;
use tango_core::RoundError;
use tango_core::ledger::LedgerUpdate;
use tango_core::matching::{MatchRound, SelectOutcome};
use tango_core::round::RoundController;
use tango_core::UsageLedger;
use tango_types::{AppEvent, FeedbackView, NoticeLevel};

use crate::events::notify;
use crate::practice::{ActiveRound, Practice, faces_view, progress_event, prompt_view};
use crate::state::AppState;

/// What a line of input did to the active round
enum InputEffect {
    Continue,
    Missed,
    Finished,
}

pub async fn handle_text_input(
    state: &AppState,
    practice: &mut Practice,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    text: &str,
) -> anyhow::Result<()> {
    if practice.awaiting_resume {
        tracing::debug!("Input ignored while waiting after a miss");
        return Ok(());
    }

    let ledger = practice.session.ledger_mut();
    let effect = match &mut practice.active {
        ActiveRound::Drill(round) => {
            submit_answer(state, round, ledger, app_to_ui_tx, text.trim()).await?
        }
        ActiveRound::Match(round) => {
            select_faces(state, round, ledger, app_to_ui_tx, text.trim()).await?
        }
        ActiveRound::None => {
            notify(app_to_ui_tx, NoticeLevel::Info, "No round in progress.").await?;
            InputEffect::Continue
        }
    };

    match effect {
        InputEffect::Continue => {}
        InputEffect::Missed => practice.awaiting_resume = true,
        InputEffect::Finished => {
            state.status.practice.write().await.rounds_completed += 1;
            practice.active = ActiveRound::None;
            app_to_ui_tx
                .send(AppEvent::RoundFinished {
                    mode: practice.mode,
                })
                .await?;
        }
    }

    Ok(())
}

async fn submit_answer(
    state: &AppState,
    round: &mut RoundController,
    ledger: &mut UsageLedger,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    text: &str,
) -> anyhow::Result<InputEffect> {
    let expected = round
        .current_card()
        .map(|card| card.expected.clone())
        .unwrap_or_default();
    let outcome = round.submit_attempt(text, ledger)?;

    state
        .status
        .practice
        .write()
        .await
        .record_attempt(outcome.accepted, outcome.ledger.persisted());
    report_persist_failure(app_to_ui_tx, &outcome.ledger).await?;

    app_to_ui_tx
        .send(AppEvent::ShowFeedback(FeedbackView {
            word_id: outcome.word_id,
            result: outcome.result,
            accepted: outcome.accepted,
            expected,
        }))
        .await?;
    app_to_ui_tx.send(progress_event(round.progress())).await?;

    if outcome.round_complete {
        return Ok(InputEffect::Finished);
    }
    if !outcome.accepted {
        return Ok(InputEffect::Missed);
    }

    round.begin_attempt()?;
    if let Some(prompt) = prompt_view(round) {
        app_to_ui_tx.send(AppEvent::ShowPrompt(prompt)).await?;
    }
    Ok(InputEffect::Continue)
}

async fn select_faces(
    state: &AppState,
    round: &mut MatchRound,
    ledger: &mut UsageLedger,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    text: &str,
) -> anyhow::Result<InputEffect> {
    let Some(numbers) = parse_face_numbers(text) else {
        notify(
            app_to_ui_tx,
            NoticeLevel::Error,
            "Type the numbers of the faces to pick, e.g. `3 7`.",
        )
        .await?;
        return Ok(InputEffect::Continue);
    };

    for number in numbers {
        let outcome = match round.select(number - 1, ledger) {
            Ok(outcome) => outcome,
            Err(RoundError::NoSuchFace(_)) => {
                notify(
                    app_to_ui_tx,
                    NoticeLevel::Error,
                    format!("There is no face {number}."),
                )
                .await?;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        match outcome {
            SelectOutcome::Ignored | SelectOutcome::Selected => {}
            SelectOutcome::Matched {
                round_complete,
                ledger: update,
                ..
            } => {
                state
                    .status
                    .practice
                    .write()
                    .await
                    .record_attempt(true, update.persisted());
                report_persist_failure(app_to_ui_tx, &update).await?;
                notify(app_to_ui_tx, NoticeLevel::Success, "Match!").await?;
                app_to_ui_tx.send(progress_event(round.progress())).await?;

                if round_complete {
                    return Ok(InputEffect::Finished);
                }
            }
            SelectOutcome::Mismatched { ledger: updates } => {
                let persisted = updates.iter().all(LedgerUpdate::persisted);
                state
                    .status
                    .practice
                    .write()
                    .await
                    .record_attempt(false, persisted);
                for update in &updates {
                    report_persist_failure(app_to_ui_tx, update).await?;
                }

                app_to_ui_tx.send(AppEvent::ShowFaces(faces_view(round))).await?;
                app_to_ui_tx.send(AppEvent::ShowMismatch).await?;
                return Ok(InputEffect::Missed);
            }
        }
    }

    app_to_ui_tx.send(AppEvent::ShowFaces(faces_view(round))).await?;
    Ok(InputEffect::Continue)
}

/// 1-based face numbers separated by whitespace or commas
fn parse_face_numbers(text: &str) -> Option<Vec<usize>> {
    let numbers: Vec<usize> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok().filter(|&n: &usize| n > 0))
        .collect::<Option<_>>()?;

    (!numbers.is_empty()).then_some(numbers)
}

async fn report_persist_failure(
    app_to_ui_tx: &AsyncSender<AppEvent>,
    update: &LedgerUpdate,
) -> anyhow::Result<()> {
    if let Some(e) = &update.persist_error {
        notify(
            app_to_ui_tx,
            NoticeLevel::Error,
            format!("Progress could not be saved: {e}"),
        )
        .await?;
    }
    Ok(())
}

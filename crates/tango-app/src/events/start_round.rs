use kanal::AsyncSender;
use tango_types::{AppEvent, DrillMode, NoticeLevel};

use crate::events::{notify, round_error_message};
use crate::practice::{ActiveRound, Practice, faces_view, progress_event, prompt_view};

pub async fn handle_start_round(
    practice: &mut Practice,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    practice.awaiting_resume = false;

    let started = match practice.mode {
        DrillMode::List => {
            app_to_ui_tx
                .send(AppEvent::ShowWords(practice.words_view()))
                .await?;
            return Ok(());
        }
        DrillMode::Match => practice.session.start_match().map(ActiveRound::Match),
        mode => practice.session.start_drill(mode).map(ActiveRound::Drill),
    };

    match started {
        Ok(mut active) => {
            match &mut active {
                ActiveRound::Drill(round) => {
                    round.begin_attempt()?;
                    if let Some(prompt) = prompt_view(round) {
                        app_to_ui_tx.send(AppEvent::ShowPrompt(prompt)).await?;
                    }
                    app_to_ui_tx.send(progress_event(round.progress())).await?;
                }
                ActiveRound::Match(round) => {
                    app_to_ui_tx.send(AppEvent::ShowFaces(faces_view(round))).await?;
                    app_to_ui_tx.send(progress_event(round.progress())).await?;
                }
                ActiveRound::None => {}
            }
            practice.active = active;
        }
        // The pool cannot change mid-session, so a retry would fail the same way
        Err(e) => {
            tracing::warn!("Round not started: {}", e);
            practice.active = ActiveRound::None;
            let message = round_error_message(&e);
            notify(app_to_ui_tx, NoticeLevel::Error, message.clone()).await?;
            return Err(anyhow::Error::new(e).context(message));
        }
    }

    Ok(())
}

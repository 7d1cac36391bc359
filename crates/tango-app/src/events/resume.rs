use kanal::AsyncSender;
use tango_types::AppEvent;

use crate::practice::{ActiveRound, Practice, faces_view, prompt_view};

/// Unlock input once the post-miss pause is over
pub async fn handle_resume(
    practice: &mut Practice,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    if !practice.awaiting_resume {
        return Ok(());
    }
    practice.awaiting_resume = false;

    match &mut practice.active {
        ActiveRound::Drill(round) => {
            round.begin_attempt()?;
            if let Some(prompt) = prompt_view(round) {
                app_to_ui_tx.send(AppEvent::ShowPrompt(prompt)).await?;
            }
        }
        ActiveRound::Match(round) => {
            round.clear_mismatch();
            app_to_ui_tx.send(AppEvent::ShowFaces(faces_view(round))).await?;
        }
        ActiveRound::None => {}
    }

    Ok(())
}

use kanal::AsyncSender;
use tango_types::{AppEvent, NoticeLevel};

use crate::events::notify;
use crate::practice::{ActiveRound, Practice, prompt_view};

/// Drop the in-flight answer without touching the ledger and listen again
pub async fn handle_cancel_attempt(
    practice: &mut Practice,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let ActiveRound::Drill(round) = &mut practice.active else {
        return Ok(());
    };
    if practice.awaiting_resume || !round.cancel_attempt() {
        return Ok(());
    }

    tracing::debug!("Attempt cancelled");
    notify(app_to_ui_tx, NoticeLevel::Info, "Attempt cancelled.").await?;

    round.begin_attempt()?;
    if let Some(prompt) = prompt_view(round) {
        app_to_ui_tx.send(AppEvent::ShowPrompt(prompt)).await?;
    }

    Ok(())
}

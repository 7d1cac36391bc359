use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tango_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::practice::Practice;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256), // face lists and feedback bursts
            ui_to_app: kanal::bounded_async(64),  // learner input
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, practice: Practice) -> anyhow::Result<JoinSet<anyhow::Result<()>>> {
        let mut tasks = JoinSet::new();

        // Event loop
        let engine = event_loop(
            self.state.clone(),
            practice,
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.clone(),
        );
        tasks.spawn(engine.in_current_span());

        // UI loop
        let ui = ui_loop(
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
            self.state.config.clone(),
            self.cancel_token.clone(),
        );
        tasks.spawn(ui.in_current_span());

        // Stdin reader, detached
        watcher_io(
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        )?;

        Ok(tasks)
    }

    /// Sender the front-end uses, e.g. to kick off the first round
    pub fn input_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.ui_to_app.0.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

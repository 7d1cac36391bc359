use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tango_config::Config;
use tango_core::store::{FileStore, KeyValueStore};
use tango_core::wordlist::load_word_list;
use tango_core::{Session, UsageLedger, WeightedSampler};
use tango_types::{AppEvent, DrillMode};
use tokio::signal;
use tracing::Instrument;
use uuid::Uuid;

mod controller;
mod events;
mod io;
mod logging;
mod practice;
mod profile;
mod state;
mod status;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::practice::Practice;
use self::state::AppState;

/// Store key remembering the word list used last time
const LAST_WORD_LIST_KEY: &str = "last_word_list";

#[derive(Parser)]
#[command(name = "tango", version, about = "Adaptive vocabulary drills")]
struct Cli {
    /// Profile to load from the profiles folder
    #[arg(long, default_value = "main")]
    profile: String,

    /// Word list file, overrides the profile and the list used last time
    #[arg(long)]
    words: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy, Debug)]
enum Command {
    /// Show every word with its usage statistics
    List,
    /// Match the faces of each word
    Match,
    /// Say or type the answer for each prompt
    Speak,
    /// Read example sentences
    Example,
    /// Clear all usage and difficulty data
    Reset,
}

impl Command {
    fn mode(self) -> Option<DrillMode> {
        match self {
            Command::List => Some(DrillMode::List),
            Command::Match => Some(DrillMode::Match),
            Command::Speak => Some(DrillMode::Speak),
            Command::Example => Some(DrillMode::Example),
            Command::Reset => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_profile(&profile::profiles_dir()?, &cli.profile)?;
    config.validate()?;

    logging::init_tracing(&config.log);

    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("session", id = %session_id, profile = %cli.profile);
    start(cli, config).instrument(span).await
}

/// Read the profile while a bootstrap subscriber catches its log lines
fn load_profile(profiles: &Path, name: &str) -> anyhow::Result<Config> {
    tracing::dispatcher::with_default(&logging::bootstrap_dispatch(), || {
        profile::init_user_config(profiles)?;
        profile::load_user_profile(profiles, name)
    })
}

async fn start(cli: Cli, config: Config) -> anyhow::Result<()> {
    let mut store = FileStore::new(&config.storage.data_dir);
    let mut ledger = UsageLedger::open(FileStore::new(&config.storage.data_dir));

    let Some(mode) = cli.command.mode() else {
        ledger.reset().context("Failed to reset usage data")?;
        println!("Usage data reset.");
        return Ok(());
    };

    let path = resolve_word_list(cli.words, &config, &store)?;
    let list = load_word_list(&path)
        .with_context(|| format!("Failed to load words from {}", path.display()))?;
    println!("Successfully loaded {} words!", list.words.len());

    if let Err(e) = remember_word_list(&mut store, &path) {
        tracing::warn!("Failed to remember word list: {}", e);
    }

    let mut session = Session::new(config.round.clone(), ledger, WeightedSampler::from_entropy());
    session.replace_pool(list);

    let state = Arc::new(AppState::new(config));

    // Shutdown future (Ctrl+C)
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    run(state, Practice::new(session, mode), shutdown).await
}

pub async fn run(
    state: Arc<AppState>,
    practice: Practice,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    let controller = AppController::new(state.clone());
    let mut tasks = controller.spawn_tasks(practice)?;
    let cancel = controller.cancel_token();

    controller.input_sender().send(AppEvent::StartRound).await?;

    let mut failure = None;
    tokio::select! {
        _ = shutdown => {
            tracing::info!("Shutdown requested");
        }
        _ = cancel.cancelled() => {
            tracing::info!("Session finished");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("task exited"),
                Ok(Err(e)) => {
                    tracing::error!("task failed: {e}");
                    failure = Some(e);
                }
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("task failed during shutdown: {e}");
                failure.get_or_insert(e);
            }
            Err(e) => tracing::error!("task panicked: {e}"),
        }
    }

    let stats = state.status.practice.read().await;
    tracing::info!("Session summary: {}", *stats);
    if stats.attempts > 0 {
        println!("{}", *stats);
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// `--words`, then the profile's list, then the one loaded last time
fn resolve_word_list(
    cli_words: Option<PathBuf>,
    config: &Config,
    store: &impl KeyValueStore,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_words {
        return Ok(path);
    }
    if let Some(path) = &config.word_list {
        return Ok(PathBuf::from(path));
    }

    match store.get(LAST_WORD_LIST_KEY) {
        Ok(Some(data)) => {
            let path: PathBuf = serde_json::from_str(&data)
                .context("Stored word list path is unreadable")?;
            tracing::info!("Using last word list {}", path.display());
            Ok(path)
        }
        Ok(None) => anyhow::bail!("No word list given. Pass --words PATH."),
        Err(e) => Err(e).context("Failed to read the last word list"),
    }
}

fn remember_word_list(
    store: &mut impl KeyValueStore,
    path: &std::path::Path,
) -> anyhow::Result<()> {
    let absolute = std::path::absolute(path)?;
    store.set(LAST_WORD_LIST_KEY, &serde_json::to_string(&absolute)?)?;
    Ok(())
}

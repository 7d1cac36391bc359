use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;

/// Running totals for the current session
#[derive(Clone, Debug, Default)]
pub struct PracticeStats {
    pub attempts: u64,
    pub correct: u64,
    pub rounds_completed: u64,
    /// Ledger writes that did not reach the store
    pub persist_failures: u64,
    pub last_attempt_time: Option<SystemTime>,
}

impl PracticeStats {
    pub fn record_attempt(&mut self, accepted: bool, persisted: bool) {
        self.attempts += 1;
        if accepted {
            self.correct += 1;
        }
        if !persisted {
            self.persist_failures += 1;
        }
        self.last_attempt_time = Some(SystemTime::now());
    }
}

impl fmt::Display for PracticeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempts, {} correct, {} rounds completed",
            self.attempts, self.correct, self.rounds_completed
        )?;
        if self.persist_failures > 0 {
            write!(f, " ({} unsaved updates)", self.persist_failures)?;
        }
        Ok(())
    }
}

/// Application status
pub struct AppStatus {
    pub practice: Arc<RwLock<PracticeStats>>,
}

impl AppStatus {
    pub fn new() -> Self {
        Self {
            practice: Arc::new(RwLock::new(PracticeStats::default())),
        }
    }
}

impl Default for AppStatus {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::BTreeMap;

use tango_types::{UsageEntry, WordId};

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Store key holding the serialized ledger
pub const LEDGER_KEY: &str = "word_usage";

/// Result of a ledger mutation
#[derive(Debug)]
pub struct LedgerUpdate {
    pub id: WordId,
    pub entry: UsageEntry,
    /// Set when the write-through save failed
    pub persist_error: Option<StoreError>,
}

impl LedgerUpdate {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

/// Persistent per-word usage and difficulty.
///
/// Write-through: every graded attempt is saved immediately. A failed save
/// leaves the in-memory map authoritative and hands the error back in the
/// [`LedgerUpdate`].
pub struct UsageLedger {
    entries: BTreeMap<WordId, UsageEntry>,
    store: Box<dyn KeyValueStore>,
}

impl UsageLedger {
    /// Load the ledger from `store`, starting empty if nothing usable is stored
    pub fn open(store: impl KeyValueStore + 'static) -> Self {
        let entries = match store.get(LEDGER_KEY) {
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Discarding unreadable usage data: {}", e);
                    BTreeMap::new()
                }
            },
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read usage data, starting fresh: {}", e);
                BTreeMap::new()
            }
        };

        tracing::debug!("Usage ledger opened with {} entries", entries.len());

        Self {
            entries,
            store: Box::new(store),
        }
    }

    /// Entry for `id`, or a fresh one; never inserts
    pub fn get(&self, id: WordId) -> UsageEntry {
        self.entries.get(&id).copied().unwrap_or_default()
    }

    pub fn contains(&self, id: WordId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (WordId, UsageEntry)> + '_ {
        self.entries.iter().map(|(id, entry)| (*id, *entry))
    }

    /// Insert `{0, 0}` for every unseen id. Returns how many were added.
    pub fn ensure_initialized<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = WordId>,
    {
        let mut added = 0;
        for id in ids {
            if let std::collections::btree_map::Entry::Vacant(slot) = self.entries.entry(id) {
                slot.insert(UsageEntry::default());
                added += 1;
            }
        }

        if added > 0 {
            tracing::debug!("Initialized usage for {} new words", added);
            if let Err(e) = self.persist() {
                tracing::warn!("Failed to save initialized usage data: {}", e);
            }
        }

        added
    }

    pub fn record_correct(&mut self, id: WordId) -> LedgerUpdate {
        let entry = self.entries.entry(id).or_default();
        entry.used_count += 1;
        entry.difficulty = entry.difficulty.saturating_sub(1);
        let entry = *entry;

        self.write_through(id, entry)
    }

    pub fn record_incorrect(&mut self, id: WordId) -> LedgerUpdate {
        let entry = self.entries.entry(id).or_default();
        entry.difficulty += 1;
        let entry = *entry;

        self.write_through(id, entry)
    }

    /// Zero every entry and save
    pub fn reset(&mut self) -> Result<(), StoreError> {
        for entry in self.entries.values_mut() {
            *entry = UsageEntry::default();
        }
        tracing::info!("Reset usage data for {} words", self.entries.len());

        self.persist()
    }

    /// Serialize the whole mapping to the store, replacing what was there
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let data = serde_json::to_string(&self.entries)?;
        self.store.set(LEDGER_KEY, &data)
    }

    fn write_through(&mut self, id: WordId, entry: UsageEntry) -> LedgerUpdate {
        let persist_error = self.persist().err();
        if let Some(e) = &persist_error {
            tracing::warn!("Usage for word {} kept in memory only: {}", id, e);
        }

        LedgerUpdate {
            id,
            entry,
            persist_error,
        }
    }
}

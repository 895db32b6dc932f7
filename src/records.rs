//! Best-time and best-level records
//!
//! Persisted as a small JSON file. Persistence is best-effort: a failed
//! load starts fresh and a failed save is logged and forgotten.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameEvent;

/// Failure reading or writing the records file
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("records I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("records file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where level results go
pub trait RecordStore {
    /// Keep the best (largest) remaining time for a level
    fn record_level_time(&mut self, level: u32, remaining_secs: f32);
    /// Keep the highest level reached
    fn record_best_level(&mut self, level: u32);
}

/// Per-level best remaining times plus the furthest level cleared
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestRecords {
    /// Level -> most seconds left on completion
    pub level_times: BTreeMap<u32, f32>,
    pub best_level: u32,
}

impl BestRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best_time(&self, level: u32) -> Option<f32> {
        self.level_times.get(&level).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.level_times.is_empty() && self.best_level == 0
    }

    /// Read records from a JSON file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, RecordsError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Write records to a JSON file
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), RecordsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load records, starting fresh if the file is missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::read(path) {
            Ok(records) => {
                log::info!("Loaded records for {} levels", records.level_times.len());
                records
            }
            Err(err) => {
                log::info!("No usable records ({err}), starting fresh");
                Self::new()
            }
        }
    }

    /// Save records; failures are logged and swallowed
    pub fn save(&self, path: impl AsRef<Path>) {
        if let Err(err) = self.write(path) {
            log::warn!("Failed to save records: {err}");
        }
    }
}

impl RecordStore for BestRecords {
    fn record_level_time(&mut self, level: u32, remaining_secs: f32) {
        let best = self.level_times.entry(level).or_insert(remaining_secs);
        if remaining_secs > *best {
            *best = remaining_secs;
        }
    }

    fn record_best_level(&mut self, level: u32) {
        self.best_level = self.best_level.max(level);
    }
}

/// Route level-complete events into a store; returns true if anything was recorded
pub fn apply_events<S: RecordStore + ?Sized>(store: &mut S, events: &[GameEvent]) -> bool {
    let mut recorded = false;
    for event in events {
        if let GameEvent::LevelComplete {
            level,
            remaining_secs,
        } = *event
        {
            store.record_level_time(level, remaining_secs);
            store.record_best_level(level);
            recorded = true;
        }
    }
    recorded
}

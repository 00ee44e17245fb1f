//! Best score tracking
//!
//! A single persisted integer: the most diamonds collected in one run.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StorageError};

/// Persisted personal best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestScore {
    pub value: u32,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "arrowSurvival.bestDiamonds";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Whether `score` would beat the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        true
    }

    /// Load the best score; missing or malformed values read as 0
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<f64>() {
                // Stored as a JS number string, so accept "7" and "7.0" alike
                Ok(v) if v.is_finite() && v >= 0.0 => {
                    log::info!("Loaded best score {}", v as u32);
                    Self::new(v as u32)
                }
                _ => {
                    log::warn!("Ignoring malformed best score {raw:?}");
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Could not read best score: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        store.set(Self::STORAGE_KEY, &self.value.to_string())?;
        log::info!("Best score saved ({})", self.value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record_only_improves() {
        let mut best = BestScore::new(5);
        assert!(!best.record(3));
        assert!(!best.record(5));
        assert_eq!(best.value, 5);
        assert!(best.record(6));
        assert_eq!(best.value, 6);
    }

    #[test]
    fn test_load_malformed_is_zero() {
        let mut store = MemoryStore::new();
        store.set(BestScore::STORAGE_KEY, "lots").unwrap();
        assert_eq!(BestScore::load(&store).value, 0);
        store.set(BestScore::STORAGE_KEY, "-4").unwrap();
        assert_eq!(BestScore::load(&store).value, 0);
    }

    #[test]
    fn test_save_load() {
        let mut store = MemoryStore::new();
        BestScore::new(12).save(&mut store).unwrap();
        assert_eq!(BestScore::load(&store).value, 12);
    }
}

//! Rover memory persistence — the load/save contract.
//!
//! The engine only knows the [`MemoryStore`] trait. Loading is
//! infallible by contract: a missing file, unreadable data or a corrupt
//! snapshot all fall back to freshly-initialized knowledge (lax
//! thresholds, zero counters, empty history) without surfacing an error.
//! Partial snapshots are merged field-wise over defaults.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use planetfall_logic::knowledge::KnowledgeStore;
use planetfall_logic::report::MissionHistory;

use crate::error::PersistenceError;

/// Everything the rover remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverMemory {
    pub knowledge: KnowledgeStore,
    pub history: MissionHistory,
}

/// Persistence collaborator. Only the contract matters to the engine;
/// the storage mechanism is the implementor's business.
pub trait MemoryStore {
    /// Load persisted memory, falling back to defaults on any problem.
    fn load(&self) -> RoverMemory;

    /// Persist a snapshot. The engine logs and swallows errors.
    fn save(&self, memory: &RoverMemory) -> Result<(), PersistenceError>;
}

/// JSON file-backed store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl MemoryStore for JsonFileStore {
    fn load(&self) -> RoverMemory {
        let mut memory = match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<RoverMemory>(&raw) {
                Ok(memory) => memory,
                Err(err) => {
                    log::warn!(
                        "corrupt rover memory at {}: {} — starting fresh",
                        self.path.display(),
                        err
                    );
                    RoverMemory::default()
                }
            },
            // A missing file is the normal first run, not an error.
            Err(_) => RoverMemory::default(),
        };
        memory.knowledge.normalize();
        memory
    }

    fn save(&self, memory: &RoverMemory) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(memory)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    cell: RefCell<RoverMemory>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory(memory: RoverMemory) -> Self {
        Self {
            cell: RefCell::new(memory),
        }
    }

    /// Inspect the last saved snapshot.
    pub fn snapshot(&self) -> RoverMemory {
        self.cell.borrow().clone()
    }
}

impl MemoryStore for InMemoryStore {
    fn load(&self) -> RoverMemory {
        let mut memory = self.cell.borrow().clone();
        memory.knowledge.normalize();
        memory
    }

    fn save(&self, memory: &RoverMemory) -> Result<(), PersistenceError> {
        *self.cell.borrow_mut() = memory.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetfall_logic::knowledge::lax;
    use planetfall_logic::planets::{PlanetId, ALL_PLANETS};

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("planetfall-{}-{}.json", tag, std::process::id()))
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let store = JsonFileStore::new(temp_path("missing"));
        let memory = store.load();
        assert!(memory.history.is_empty());
        for id in ALL_PLANETS {
            assert!(memory.knowledge.get(id).is_first_attempt());
        }
    }

    #[test]
    fn test_roundtrip() {
        let path = temp_path("roundtrip");
        let store = JsonFileStore::new(&path);

        let mut memory = RoverMemory::default();
        memory
            .knowledge
            .get_mut(PlanetId::Mercury)
            .tighten_temperature(430.0);
        memory.knowledge.get_mut(PlanetId::Mercury).failures = 1;
        store.save(&memory).unwrap();

        let loaded = store.load();
        let k = loaded.knowledge.get(PlanetId::Mercury);
        assert!((k.temperature_threshold - 420.0).abs() < f32::EPSILON);
        assert_eq!(k.failures, 1);
        // Untouched planets keep lax defaults.
        assert_eq!(
            loaded.knowledge.get(PlanetId::Venus).temperature_threshold,
            lax::TEMPERATURE
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let path = temp_path("corrupt");
        fs::write(&path, "{ not json at all").unwrap();
        let store = JsonFileStore::new(&path);
        let memory = store.load();
        assert!(memory.history.is_empty());
        assert!(memory.knowledge.get(PlanetId::Earth).is_first_attempt());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_partial_snapshot_merges_over_defaults() {
        let path = temp_path("partial");
        // Only one planet, only one field: the rest must fill in.
        fs::write(
            &path,
            r#"{ "knowledge": { "Mercury": { "failures": 2 } } }"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);
        let memory = store.load();
        let mercury = memory.knowledge.get(PlanetId::Mercury);
        assert_eq!(mercury.failures, 2);
        assert_eq!(mercury.temperature_threshold, lax::TEMPERATURE);
        assert!(memory.knowledge.get(PlanetId::Neptune).is_first_attempt());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryStore::new();
        let mut memory = store.load();
        memory.knowledge.get_mut(PlanetId::Mars).successes = 4;
        store.save(&memory).unwrap();
        assert_eq!(store.load().knowledge.get(PlanetId::Mars).successes, 4);
    }
}

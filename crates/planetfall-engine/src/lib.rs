//! Adaptive mission engine runtime for Planetfall.
//!
//! Everything stateful lives here: the per-mission session state machine,
//! the cooperative timer pool, the engine facade that owns knowledge and
//! history, the event stream consumed by the presentation layer, and the
//! persistence contract. All simulation *rules* live in
//! [`planetfall_logic`]; this crate only decides *when* they run.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`engine`] | Mission engine facade: start trigger, tick pump, history, persistence |
//! | [`session`] | Per-mission exploration state machine |
//! | [`timers`] | Named, cancelable delayed callbacks (generation-scoped) |
//! | [`events`] | Typed engine → presentation event stream |
//! | [`persistence`] | `MemoryStore` contract, JSON file store, in-memory store |
//! | [`error`] | Error types |

pub mod engine;
pub mod error;
pub mod events;
pub mod persistence;
pub mod session;
pub mod timers;

pub use engine::{EngineConfig, EnginePhase, MissionEngine};
pub use events::{DebugSnapshot, EngineEvent, EventBus, HudUpdate, MissionTally};
pub use persistence::{InMemoryStore, JsonFileStore, MemoryStore, RoverMemory};
pub use session::{ExplorationSession, SessionConfig, SessionPhase};

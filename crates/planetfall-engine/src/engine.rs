//! Mission engine facade — owns the learned knowledge, the mission
//! history, the generation counter and at most one live session.
//!
//! Missions start in two steps, mirroring the travel flow: a request
//! moves the engine into an awaiting-launch state, and `launch` actually
//! creates the session. Requests are rejected (silently, with a debug
//! log) while anything is in flight. Every resolved mission appends one
//! report to the history, emits it on the bus in generation order, and
//! persists a snapshot.

use planetfall_logic::knowledge::KnowledgeStore;
use planetfall_logic::movement::DirectionalInput;
use planetfall_logic::planets::PlanetId;
use planetfall_logic::report::{MissionHistory, MissionReport, ThresholdSnapshot};

use crate::events::{DebugSnapshot, EngineEvent, EventBus, MissionTally};
use crate::persistence::{MemoryStore, RoverMemory};
use crate::session::{ExplorationSession, SessionConfig};

/// Engine-level configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub viewport: (f32, f32),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: (1280.0, 720.0),
        }
    }
}

/// Where the engine is between missions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    /// Traveled to a planet, waiting for launch confirmation.
    AwaitingLaunch(PlanetId),
    Exploring,
}

/// The adaptive mission engine.
pub struct MissionEngine<S: MemoryStore> {
    store: S,
    knowledge: KnowledgeStore,
    history: MissionHistory,
    generation: u32,
    phase: EnginePhase,
    session: Option<ExplorationSession>,
    bus: EventBus,
    config: EngineConfig,
}

impl<S: MemoryStore> MissionEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        let RoverMemory { knowledge, history } = store.load();
        // Resume the generation counter past everything already recorded
        // so report delivery stays monotonic across runs.
        let generation = history.max_generation();
        Self {
            store,
            knowledge,
            history,
            generation,
            phase: EnginePhase::Idle,
            session: None,
            bus: EventBus::new(),
            config,
        }
    }

    /// Register a presentation sink.
    pub fn subscribe(&mut self, sink: impl FnMut(&EngineEvent) + 'static) {
        self.bus.subscribe(sink);
    }

    /// Mission start trigger. No-op unless the engine is idle.
    pub fn request_mission(&mut self, id: PlanetId) {
        if self.phase != EnginePhase::Idle {
            log::debug!("mission request for {:?} ignored: engine busy", id);
            return;
        }
        self.phase = EnginePhase::AwaitingLaunch(id);
        let planet = id.info();
        self.bus.status(format!("Viajando a {}...", planet.name), 3200);
        self.emit_debug();
    }

    /// Stringly-typed mission start, for external triggers. Unknown ids
    /// are diagnosed and ignored without touching any state.
    pub fn request_mission_key(&mut self, key: &str) {
        match PlanetId::from_key(key) {
            Some(id) => self.request_mission(id),
            None => log::warn!("unknown planet id {:?} — mission request ignored", key),
        }
    }

    /// Confirm the pending mission and create the session.
    pub fn launch(&mut self) {
        let EnginePhase::AwaitingLaunch(id) = self.phase else {
            log::debug!("launch ignored: no mission awaiting confirmation");
            return;
        };

        self.generation += 1;
        self.bus.emit(EngineEvent::GenerationChanged(self.generation));
        self.bus.emit(EngineEvent::PlanetChanged(id));

        let mut session = ExplorationSession::new(
            id,
            self.knowledge.get(id),
            self.generation,
            SessionConfig {
                viewport: self.config.viewport,
                seed: u64::from(self.generation),
            },
        );
        session.start(&mut self.bus);
        self.session = Some(session);
        self.phase = EnginePhase::Exploring;
        self.emit_debug();
    }

    /// Drive the live session one tick. Harmless when no session exists.
    pub fn tick(&mut self, dt_ms: f64, input: DirectionalInput) {
        let report = match self.session.as_mut() {
            Some(session) => session.tick(dt_ms, input, &mut self.knowledge, &mut self.bus),
            None => return,
        };
        if let Some(report) = report {
            self.finish_mission(report);
        }
    }

    /// External abort/return request.
    pub fn abort_mission(&mut self) {
        match self.phase {
            EnginePhase::Idle => {}
            EnginePhase::AwaitingLaunch(_) => {
                // Nothing started yet: just come home.
                self.phase = EnginePhase::Idle;
                self.emit_debug();
            }
            EnginePhase::Exploring => {
                let report = match self.session.as_mut() {
                    Some(session) => session.abort(&mut self.knowledge, &mut self.bus),
                    None => None,
                };
                match report {
                    Some(report) => self.finish_mission(report),
                    None => {
                        self.session = None;
                        self.phase = EnginePhase::Idle;
                    }
                }
            }
        }
    }

    fn finish_mission(&mut self, report: MissionReport) {
        self.history.push(report.clone());
        self.bus.emit(EngineEvent::Report(report));
        self.emit_debug();
        self.persist();
        // Terminal sessions are discarded; their timers die with them.
        self.session = None;
        self.phase = EnginePhase::Idle;
    }

    fn persist(&mut self) {
        let memory = RoverMemory {
            knowledge: self.knowledge.clone(),
            history: self.history.clone(),
        };
        if let Err(err) = self.store.save(&memory) {
            log::warn!("failed to persist rover memory: {}", err);
        }
    }

    fn current_planet(&self) -> Option<PlanetId> {
        match self.phase {
            EnginePhase::Idle => None,
            EnginePhase::AwaitingLaunch(id) => Some(id),
            EnginePhase::Exploring => self.session.as_ref().map(|s| s.planet_id()),
        }
    }

    /// Structured snapshot for the debug overlay.
    pub fn debug_snapshot(&self) -> DebugSnapshot {
        let planet = self.current_planet();
        let knowledge = planet.map(|id| self.knowledge.get(id));
        DebugSnapshot {
            generation: self.generation,
            planet_id: planet,
            planet_name: planet.map(|id| id.info().name),
            thresholds: knowledge.map(ThresholdSnapshot::from),
            protections: self.session.as_ref().map(|s| s.protections()),
            missions: knowledge.map(|k| MissionTally {
                failures: k.failures,
                successes: k.successes,
            }),
        }
    }

    fn emit_debug(&mut self) {
        let snapshot = self.debug_snapshot();
        self.bus.emit(EngineEvent::Debug(snapshot));
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn history(&self) -> &MissionHistory {
        &self.history
    }

    pub fn session(&self) -> Option<&ExplorationSession> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::InMemoryStore;
    use planetfall_logic::report::MissionOutcome;

    fn engine() -> MissionEngine<InMemoryStore> {
        MissionEngine::new(InMemoryStore::new())
    }

    /// Land, explore nothing, abort: resolves via the first-attempt or
    /// hazard path and returns the engine to idle.
    fn run_short_mission(engine: &mut MissionEngine<InMemoryStore>, id: PlanetId) {
        engine.request_mission(id);
        engine.launch();
        engine.tick(1500.0, DirectionalInput::IDLE);
        engine.abort_mission();
        assert_eq!(engine.phase(), EnginePhase::Idle);
    }

    #[test]
    fn test_two_step_start() {
        let mut engine = engine();
        assert_eq!(engine.phase(), EnginePhase::Idle);
        engine.request_mission(PlanetId::Mars);
        assert_eq!(engine.phase(), EnginePhase::AwaitingLaunch(PlanetId::Mars));
        assert_eq!(engine.generation(), 0, "generation bumps at launch");
        engine.launch();
        assert_eq!(engine.phase(), EnginePhase::Exploring);
        assert_eq!(engine.generation(), 1);
    }

    #[test]
    fn test_reentrant_requests_rejected() {
        let mut engine = engine();
        engine.request_mission(PlanetId::Mars);
        engine.request_mission(PlanetId::Venus);
        assert_eq!(engine.phase(), EnginePhase::AwaitingLaunch(PlanetId::Mars));
        engine.launch();
        engine.request_mission(PlanetId::Venus);
        assert_eq!(engine.phase(), EnginePhase::Exploring);
        assert!(engine.session().is_some());
        assert_eq!(engine.session().unwrap().planet_id(), PlanetId::Mars);
    }

    #[test]
    fn test_unknown_planet_key_is_noop() {
        let mut engine = engine();
        engine.request_mission_key("PLUTO");
        assert_eq!(engine.phase(), EnginePhase::Idle);
        engine.request_mission_key("mars");
        assert_eq!(engine.phase(), EnginePhase::AwaitingLaunch(PlanetId::Mars));
    }

    #[test]
    fn test_launch_without_request_is_noop() {
        let mut engine = engine();
        engine.launch();
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_abort_awaiting_launch_starts_nothing() {
        let mut engine = engine();
        engine.request_mission(PlanetId::Venus);
        engine.abort_mission();
        assert_eq!(engine.phase(), EnginePhase::Idle);
        assert!(engine.history().is_empty());
        assert!(engine.knowledge().get(PlanetId::Venus).is_first_attempt());
    }

    #[test]
    fn test_mission_appends_history_and_persists() {
        let mut engine = engine();
        run_short_mission(&mut engine, PlanetId::Earth);

        assert_eq!(engine.history().len(), 1);
        let report = engine.history().last().unwrap();
        assert_eq!(report.generation, 1);
        assert_eq!(report.outcome, MissionOutcome::Failure);
        assert_eq!(report.failure_reason.as_deref(), Some("inexperiencia"));

        let saved = engine.store().snapshot();
        assert_eq!(saved.history.len(), 1);
        assert_eq!(saved.knowledge.get(PlanetId::Earth).failures, 1);
    }

    #[test]
    fn test_generation_resumes_from_history() {
        let store = InMemoryStore::new();
        {
            let mut engine = MissionEngine::new(store);
            run_short_mission(&mut engine, PlanetId::Earth);
            run_short_mission(&mut engine, PlanetId::Mars);
            assert_eq!(engine.generation(), 2);

            // A rebuilt engine over the same store picks up where the
            // last one stopped.
            let snapshot = engine.store().snapshot();
            let mut revived = MissionEngine::new(InMemoryStore::with_memory(snapshot));
            assert_eq!(revived.generation(), 2);
            run_short_mission(&mut revived, PlanetId::Earth);
            assert_eq!(revived.history().last().unwrap().generation, 3);
        }
    }

    #[test]
    fn test_learning_survives_engine_restart() {
        let mut engine = engine();
        run_short_mission(&mut engine, PlanetId::Earth); // inexperiencia

        let snapshot = engine.store().snapshot();
        let mut revived = MissionEngine::new(InMemoryStore::with_memory(snapshot));
        run_short_mission(&mut revived, PlanetId::Earth);
        let report = revived.history().last().unwrap();
        // Aborted before the goal, but the resolution itself succeeded.
        assert_eq!(report.outcome, MissionOutcome::Partial);
        assert_eq!(revived.knowledge().get(PlanetId::Earth).successes, 1);
    }

    #[test]
    fn test_debug_snapshot_tracks_mission() {
        let mut engine = engine();
        let snap = engine.debug_snapshot();
        assert_eq!(snap.planet_id, None);

        engine.request_mission(PlanetId::Mercury);
        let snap = engine.debug_snapshot();
        assert_eq!(snap.planet_id, Some(PlanetId::Mercury));
        assert_eq!(snap.planet_name, Some("Mercurio"));
        assert!(snap.protections.is_none(), "no session yet");

        engine.launch();
        let snap = engine.debug_snapshot();
        assert!(snap.protections.is_some());
        assert_eq!(
            snap.missions,
            Some(MissionTally {
                failures: 0,
                successes: 0
            })
        );
    }
}

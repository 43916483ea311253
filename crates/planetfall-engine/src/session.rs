//! Live exploration session — the per-mission state machine.
//!
//! One session per mission: `Initializing → Landing → (AerialIntro |
//! SurfaceIntro) → ActiveExploration → Evaluating → Completed`, with
//! `Destroyed` reachable only from active exploration. The session owns
//! its timers (nothing armed here can outlive it) and holds the
//! mission-evaluated latch: no matter how many triggers fire — goal
//! settle, destruction, abort — knowledge mutates at most once.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use planetfall_logic::hazard::{self, DangerProfile, HazardEvaluation, ProtectionDecision};
use planetfall_logic::knowledge::{KnowledgeStore, PlanetKnowledge};
use planetfall_logic::movement::{self, DirectionalInput, WorldBounds};
use planetfall_logic::outcome::{self, UnitStatus};
use planetfall_logic::planets::{Planet, PlanetId};
use planetfall_logic::report::{MissionOutcome, MissionReport, SensorSnapshot, ThresholdSnapshot};

use crate::events::{EngineEvent, EventBus, HudUpdate};
use crate::timers::{names, TimerPool};

/// Health at mission start.
pub const INITIAL_HEALTH: f32 = 100.0;

/// Grace window after entering active exploration, in ms. Prevents
/// instant death on spawn.
pub const SPAWN_GRACE_MS: f64 = 1500.0;

/// Shorter grace window armed once by the first movement, in ms.
pub const FIRST_MOVE_GRACE_MS: f64 = 800.0;

/// Settle delay between meeting the mission goal and evaluation, in ms.
pub const SETTLE_DELAY_MS: f64 = 420.0;

/// Cue delay between touchdown and free exploration, in ms.
pub const INTRO_CUE_MS: f64 = 420.0;

/// Proximity radius for sample pickup, in world units.
pub const SAMPLE_PICKUP_RADIUS: f32 = 48.0;

/// Movement-proportional hazard damage, hp per unit of distance.
pub const MOVE_DAMAGE_PER_UNIT: f32 = 0.015;

/// Landing descent duration: heavier planets land slower.
pub fn landing_duration_ms(gravity_g: f32) -> f64 {
    (950.0 + (gravity_g - 1.0) * 240.0).clamp(750.0, 1350.0) as f64
}

/// Session state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Landing,
    AerialIntro,
    SurfaceIntro,
    ActiveExploration,
    Evaluating,
    Completed,
    Destroyed,
}

/// Per-session configuration supplied by the engine.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub viewport: (f32, f32),
    /// Seed for deterministic sample placement.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport: (1280.0, 720.0),
            seed: 0,
        }
    }
}

#[derive(Debug)]
struct Milestone {
    threshold: f32,
    message: String,
}

#[derive(Debug)]
struct CollectionState {
    goal: u32,
    collected: u32,
    damage_per_second: f32,
    sample_pos: Option<(f32, f32)>,
    rng: StdRng,
}

/// One live mission. Created by the engine at launch, discarded after a
/// terminal phase is reached.
#[derive(Debug)]
pub struct ExplorationSession {
    planet: Planet,
    generation: u32,
    danger: DangerProfile,
    /// Hazard evaluation frozen at session start — knowledge only changes
    /// at resolution, so this stays valid for the whole mission.
    evaluation: HazardEvaluation,
    /// Flight mode: no surface, but at least one recorded mission.
    aerial: bool,
    intro_messages: &'static [&'static str],
    phase: SessionPhase,
    bounds: WorldBounds,
    x: f32,
    y: f32,
    speed: f32,
    progress: f32,
    step_goal: f32,
    milestones: VecDeque<Milestone>,
    collection: Option<CollectionState>,
    health: f32,
    goal_reached: bool,
    /// The mission-evaluated latch: knowledge mutates at most once.
    evaluated: bool,
    grace_until_ms: f64,
    move_grace_available: bool,
    timers: TimerPool,
}

impl ExplorationSession {
    pub fn new(
        planet_id: PlanetId,
        knowledge: &PlanetKnowledge,
        generation: u32,
        config: SessionConfig,
    ) -> Self {
        let planet = planet_id.info();
        let profile = planet_id.profile();
        let danger = planet_id.danger_profile();
        let evaluation = hazard::evaluate(&planet, knowledge, &danger);
        let aerial = !planet.has_surface && knowledge.mission_count() > 0;
        let speed = movement::effective_speed(
            &planet,
            &danger,
            &evaluation.protections,
            evaluation.any_unmitigated(),
        );
        let bounds = WorldBounds::for_viewport(config.viewport.0, config.viewport.1);
        let collection = planet.has_surface.then(|| profile.collection).flatten().map(
            |cfg| CollectionState {
                goal: cfg.sample_goal,
                collected: 0,
                damage_per_second: cfg.damage_per_second,
                sample_pos: None,
                rng: StdRng::seed_from_u64(config.seed),
            },
        );

        Self {
            planet,
            generation,
            danger,
            evaluation,
            aerial,
            intro_messages: profile.intro_messages,
            phase: SessionPhase::Initializing,
            bounds,
            x: config.viewport.0 / 2.0,
            y: config.viewport.1 * 0.7,
            speed,
            progress: 0.0,
            step_goal: profile.step_goal(),
            milestones: VecDeque::new(),
            collection,
            health: INITIAL_HEALTH,
            goal_reached: false,
            evaluated: false,
            grace_until_ms: f64::MAX,
            move_grace_available: true,
            timers: TimerPool::new(),
        }
    }

    /// Begin the landing descent. No-op outside `Initializing`.
    pub fn start(&mut self, bus: &mut EventBus) {
        if self.phase != SessionPhase::Initializing {
            return;
        }
        self.phase = SessionPhase::Landing;
        bus.emit(EngineEvent::UnitStatusChanged(UnitStatus::Moving));
        bus.emit(EngineEvent::UnitMoved {
            x: self.x,
            y: self.y,
        });
        self.emit_hud(bus);
        self.timers.schedule(
            names::LANDING,
            self.generation,
            landing_duration_ms(self.planet.gravity_g),
        );
    }

    /// Advance one tick. Returns the mission report when this tick
    /// resolved the mission (at most once per session).
    pub fn tick(
        &mut self,
        dt_ms: f64,
        input: DirectionalInput,
        knowledge: &mut KnowledgeStore,
        bus: &mut EventBus,
    ) -> Option<MissionReport> {
        if self.is_terminal() {
            return None;
        }

        let mut report = None;
        for fired in self.timers.advance(dt_ms) {
            if fired.generation != self.generation {
                continue;
            }
            match fired.name {
                names::LANDING => {
                    if let Some(r) = self.on_landed(knowledge, bus) {
                        report.get_or_insert(r);
                    }
                }
                names::INTRO => self.enter_active(bus),
                names::SETTLE => {
                    if let Some(r) = self.evaluate(knowledge, bus) {
                        report.get_or_insert(r);
                    }
                }
                _ => {}
            }
        }

        if self.phase == SessionPhase::ActiveExploration {
            if let Some(r) = self.active_tick(dt_ms, input, knowledge, bus) {
                report.get_or_insert(r);
            }
        }

        report
    }

    /// External abort/return request. Forces one evaluation pass with the
    /// current partial state unless the mission already resolved — every
    /// started mission yields exactly one report.
    pub fn abort(
        &mut self,
        knowledge: &mut KnowledgeStore,
        bus: &mut EventBus,
    ) -> Option<MissionReport> {
        if self.evaluated {
            return None;
        }
        bus.log("Mision abortada. Regresando a la nave nodriza.");
        self.evaluate(knowledge, bus)
    }

    // ── Phase transitions ───────────────────────────────────────────────

    fn on_landed(
        &mut self,
        knowledge: &mut KnowledgeStore,
        bus: &mut EventBus,
    ) -> Option<MissionReport> {
        bus.log(format!("Exploracion iniciada en {}", self.planet.name));

        // No solid ground and nothing learned yet: the landing attempt
        // itself is the mission.
        if !self.planet.has_surface && !self.aerial {
            return self.evaluate(knowledge, bus);
        }

        self.phase = if self.aerial {
            bus.emit(EngineEvent::UnitStatusChanged(UnitStatus::Exploring));
            SessionPhase::AerialIntro
        } else {
            bus.emit(EngineEvent::UnitStatusChanged(UnitStatus::Normal));
            SessionPhase::SurfaceIntro
        };
        self.timers
            .schedule(names::INTRO, self.generation, INTRO_CUE_MS);
        None
    }

    fn enter_active(&mut self, bus: &mut EventBus) {
        self.phase = SessionPhase::ActiveExploration;
        self.grace_until_ms = self.timers.now_ms() + SPAWN_GRACE_MS;

        bus.emit(EngineEvent::UnitStatusChanged(if self.aerial {
            UnitStatus::Exploring
        } else {
            UnitStatus::Moving
        }));
        bus.status("Explora con W A S D", 420);

        let profile = self.planet.id.profile();
        let mut messages: Vec<String> = profile
            .exploration_messages()
            .iter()
            .map(|s| s.to_string())
            .collect();
        messages.extend(danger_alerts(&self.planet, &self.danger));
        let count = messages.len();
        self.milestones = messages
            .into_iter()
            .enumerate()
            .map(|(i, message)| Milestone {
                threshold: self.step_goal * ((i + 1) as f32) / ((count + 1) as f32),
                message,
            })
            .collect();

        if self.collection.is_some() {
            self.spawn_sample(bus);
        }
        self.emit_hud(bus);
    }

    fn active_tick(
        &mut self,
        dt_ms: f64,
        input: DirectionalInput,
        knowledge: &mut KnowledgeStore,
        bus: &mut EventBus,
    ) -> Option<MissionReport> {
        let dt_s = (dt_ms / 1000.0) as f32;
        let step = movement::step(self.x, self.y, input, self.speed, dt_s, &self.bounds);
        let moved = step.distance;

        if moved > 0.0 {
            // The first movement renews the grace window once.
            if self.move_grace_available {
                self.move_grace_available = false;
                let renewed = self.timers.now_ms() + FIRST_MOVE_GRACE_MS;
                if renewed > self.grace_until_ms {
                    self.grace_until_ms = renewed;
                }
            }
            self.x = step.x;
            self.y = step.y;
            bus.emit(EngineEvent::UnitMoved {
                x: self.x,
                y: self.y,
            });
            self.progress += moved;
            self.check_milestones(bus);

            let mut picked = None;
            if let Some(col) = self.collection.as_mut() {
                if let Some((sx, sy)) = col.sample_pos {
                    if (step.x - sx).hypot(step.y - sy) <= SAMPLE_PICKUP_RADIUS {
                        col.collected += 1;
                        col.sample_pos = None;
                        picked = Some((col.collected, col.goal));
                    }
                }
            }
            if let Some((collected, goal)) = picked {
                bus.status(format!("Muestra recuperada ({}/{})", collected, goal), 340);
                self.emit_hud(bus);
                if collected >= goal {
                    self.goal_met(bus);
                } else {
                    self.spawn_sample(bus);
                }
            }

            if self.collection.is_none() && !self.goal_reached && self.progress >= self.step_goal {
                self.goal_met(bus);
            }
        }

        // Continuous hazard accrual (collection mode only), computed from
        // the movement delta produced this same tick.
        if let Some(dps) = self.collection.as_ref().map(|c| c.damage_per_second) {
            if self.evaluation.any_unmitigated() && self.timers.now_ms() >= self.grace_until_ms {
                let damage = dps * dt_s + MOVE_DAMAGE_PER_UNIT * moved;
                if damage > 0.0 {
                    self.health = (self.health - damage).max(0.0);
                    self.emit_hud(bus);
                    if self.health <= 0.0 {
                        self.phase = SessionPhase::Destroyed;
                        bus.status("Señal perdida. Unidad destruida.", 400);
                        return self.evaluate(knowledge, bus);
                    }
                }
            }
        }

        None
    }

    fn goal_met(&mut self, bus: &mut EventBus) {
        if self.goal_reached {
            return;
        }
        self.goal_reached = true;
        bus.status("Analizando muestras...", 400);
        self.timers
            .schedule(names::SETTLE, self.generation, SETTLE_DELAY_MS);
    }

    /// Resolve the mission. Guarded by the evaluated latch: the second and
    /// later calls are no-ops regardless of which trigger fired.
    fn evaluate(
        &mut self,
        knowledge: &mut KnowledgeStore,
        bus: &mut EventBus,
    ) -> Option<MissionReport> {
        if self.evaluated {
            return None;
        }
        self.evaluated = true;
        let destroyed = self.phase == SessionPhase::Destroyed;
        if !destroyed {
            self.phase = SessionPhase::Evaluating;
        }

        let resolution = outcome::resolve(
            &self.planet,
            knowledge.get_mut(self.planet.id),
            self.generation,
            &self.danger,
        );

        let mut narrative: Vec<String> =
            self.intro_messages.iter().map(|s| s.to_string()).collect();
        narrative.extend(resolution.narrative.iter().cloned());
        if destroyed {
            narrative
                .push("Unidad destruida por exposicion continua. Recuperacion remota iniciada.".into());
        }
        for line in &narrative {
            bus.log(line.clone());
        }
        bus.emit(EngineEvent::Narrative(narrative));
        bus.emit(EngineEvent::UnitStatusChanged(resolution.unit_status));

        let outcome = if !resolution.success {
            MissionOutcome::Failure
        } else if self.goal_reached {
            MissionOutcome::Success
        } else {
            // Aborted on the success path before the goal was met.
            MissionOutcome::Partial
        };

        let report = MissionReport {
            planet_id: self.planet.id,
            planet_name: self.planet.name.to_string(),
            generation: self.generation,
            sensors: SensorSnapshot::from(&self.planet),
            protections: resolution.protections,
            outcome,
            failure_reason: resolution.failure_reason.map(|r| r.as_str().to_string()),
            thresholds: ThresholdSnapshot::from(knowledge.get(self.planet.id)),
        };

        self.timers.cancel_generation(self.generation);
        self.phase = if destroyed {
            SessionPhase::Destroyed
        } else {
            SessionPhase::Completed
        };
        Some(report)
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn check_milestones(&mut self, bus: &mut EventBus) {
        if let Some(next) = self.milestones.front() {
            if self.progress >= next.threshold {
                let milestone = self.milestones.pop_front().unwrap();
                bus.status(milestone.message, 340);
            }
        }
    }

    fn spawn_sample(&mut self, bus: &mut EventBus) {
        let (x, y) = {
            let Some(col) = self.collection.as_mut() else {
                return;
            };
            let mut pos = (self.bounds.min_x + 20.0, self.bounds.min_y);
            // Keep pickups away from the rover so collection requires
            // actual roaming; give up after a few rolls.
            for _ in 0..8 {
                let px = col
                    .rng
                    .gen_range(self.bounds.min_x + 20.0..self.bounds.max_x - 20.0);
                let py = col.rng.gen_range(self.bounds.min_y..self.bounds.max_y);
                pos = (px, py);
                if (px - self.x).hypot(py - self.y) >= 100.0 {
                    break;
                }
            }
            col.sample_pos = Some(pos);
            pos
        };
        bus.emit(EngineEvent::SamplePlaced { x, y });
    }

    fn emit_hud(&self, bus: &mut EventBus) {
        let (collected, goal) = self
            .collection
            .as_ref()
            .map(|c| (c.collected, c.goal))
            .unwrap_or((0, 0));
        bus.emit(EngineEvent::Hud(HudUpdate {
            planet: Some(self.planet.id),
            health: self.health,
            samples_collected: collected,
            sample_goal: goal,
        }));
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn planet_id(&self) -> PlanetId {
        self.planet.id
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, SessionPhase::Completed | SessionPhase::Destroyed)
    }

    pub fn is_aerial(&self) -> bool {
        self.aerial
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn protections(&self) -> ProtectionDecision {
        self.evaluation.protections
    }

    pub fn samples_collected(&self) -> u32 {
        self.collection.as_ref().map(|c| c.collected).unwrap_or(0)
    }

    pub fn sample_position(&self) -> Option<(f32, f32)> {
        self.collection.as_ref().and_then(|c| c.sample_pos)
    }

    pub fn was_evaluated(&self) -> bool {
        self.evaluated
    }
}

/// Alert strings for every axis at or over its danger constant, merged
/// into the milestone cue stream at exploration start.
fn danger_alerts(planet: &Planet, danger: &DangerProfile) -> Vec<String> {
    let mut alerts = Vec::new();
    if planet.temperature_c >= danger.temperature_c {
        alerts.push("Alerta: temperatura alta, riesgo de sobrecalentamiento.".to_string());
    }
    if planet.radiation >= danger.radiation {
        alerts.push("Alerta: radiación elevada, activando escudos.".to_string());
    }
    if planet.gravity_g >= danger.gravity_g {
        alerts.push("Alerta: gravedad intensa, estabilizando.".to_string());
    }
    if planet.humidity >= danger.humidity {
        alerts.push("Alerta: humedad crítica, sellando compartimentos.".to_string());
    }
    alerts
}

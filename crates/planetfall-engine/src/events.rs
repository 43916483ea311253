//! Engine → presentation event stream.
//!
//! The renderer, HUD, log view and debug overlay are pure sinks: the
//! engine pushes typed events at them and never reads anything back.
//! Subscribers run synchronously on the engine thread, in registration
//! order.

use planetfall_logic::hazard::ProtectionDecision;
use planetfall_logic::outcome::UnitStatus;
use planetfall_logic::planets::PlanetId;
use planetfall_logic::report::{MissionReport, ThresholdSnapshot};

/// HUD telemetry: health bar, sample counter, current planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudUpdate {
    pub planet: Option<PlanetId>,
    pub health: f32,
    pub samples_collected: u32,
    pub sample_goal: u32,
}

/// Mission tally for one planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionTally {
    pub failures: u32,
    pub successes: u32,
}

/// Structured snapshot for the debug overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugSnapshot {
    pub generation: u32,
    pub planet_id: Option<PlanetId>,
    pub planet_name: Option<&'static str>,
    pub thresholds: Option<ThresholdSnapshot>,
    pub protections: Option<ProtectionDecision>,
    pub missions: Option<MissionTally>,
}

/// Everything the engine tells the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// One line for the mission log.
    LogLine(String),
    /// Ordered narrative block shown at mission resolution.
    Narrative(Vec<String>),
    /// Transient toast with a suggested visible duration.
    Status { text: String, visible_ms: u32 },
    /// Rover position changed.
    UnitMoved { x: f32, y: f32 },
    /// A collectible sample appeared at this position.
    SamplePlaced { x: f32, y: f32 },
    /// Locomotion/status tag for the renderer.
    UnitStatusChanged(UnitStatus),
    Hud(HudUpdate),
    GenerationChanged(u32),
    PlanetChanged(PlanetId),
    /// One per resolved mission, in generation order.
    Report(MissionReport),
    Debug(DebugSnapshot),
}

type Sink = Box<dyn FnMut(&EngineEvent)>;

/// Single-threaded fan-out bus.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Sink>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: impl FnMut(&EngineEvent) + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn emit(&mut self, event: EngineEvent) {
        for sink in &mut self.sinks {
            sink(&event);
        }
    }

    pub fn log(&mut self, line: impl Into<String>) {
        self.emit(EngineEvent::LogLine(line.into()));
    }

    pub fn status(&mut self, text: impl Into<String>, visible_ms: u32) {
        self.emit(EngineEvent::Status {
            text: text.into(),
            visible_ms,
        });
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_fan_out_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| {
                if let EngineEvent::LogLine(line) = event {
                    seen.borrow_mut().push(format!("{}:{}", tag, line));
                }
            });
        }
        bus.log("hola");
        assert_eq!(*seen.borrow(), vec!["a:hola", "b:hola"]);
    }

    #[test]
    fn test_status_helper() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| seen.borrow_mut().push(event.clone()));
        }
        bus.status("Viajando...", 3200);
        assert_eq!(
            seen.borrow()[0],
            EngineEvent::Status {
                text: "Viajando...".into(),
                visible_ms: 3200
            }
        );
    }
}

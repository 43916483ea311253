//! Immutable mission records and the mission history.
//!
//! One [`MissionReport`] per resolved mission, appended in resolution
//! order and never mutated afterward. The history is what external
//! observers (log views, learning dashboards) consume.

use serde::{Deserialize, Serialize};

use crate::hazard::ProtectionDecision;
use crate::knowledge::PlanetKnowledge;
use crate::planets::{Planet, PlanetId};

/// How a mission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionOutcome {
    Success,
    Failure,
    /// Aborted on the success path before the mission goal was met.
    Partial,
}

/// Sensor readings frozen at mission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub temperature_c: f32,
    pub gravity_g: f32,
    pub humidity: f32,
    pub radiation: f32,
    pub has_life: bool,
}

impl From<&Planet> for SensorSnapshot {
    fn from(planet: &Planet) -> Self {
        Self {
            temperature_c: planet.temperature_c,
            gravity_g: planet.gravity_g,
            humidity: planet.humidity,
            radiation: planet.radiation,
            has_life: planet.has_life,
        }
    }
}

/// Learned thresholds frozen after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSnapshot {
    pub temperature_threshold: f32,
    pub radiation_threshold: f32,
    pub gravity_threshold: f32,
    pub humidity_threshold: f32,
}

impl From<&PlanetKnowledge> for ThresholdSnapshot {
    fn from(k: &PlanetKnowledge) -> Self {
        Self {
            temperature_threshold: k.temperature_threshold,
            radiation_threshold: k.radiation_threshold,
            gravity_threshold: k.gravity_threshold,
            humidity_threshold: k.humidity_threshold,
        }
    }
}

/// Immutable record of one resolved mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub planet_id: PlanetId,
    pub planet_name: String,
    pub generation: u32,
    pub sensors: SensorSnapshot,
    pub protections: ProtectionDecision,
    pub outcome: MissionOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Thresholds *after* this mission's learning was applied.
    pub thresholds: ThresholdSnapshot,
}

/// Append-only mission record, ordered by resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionHistory {
    reports: Vec<MissionReport>,
}

impl MissionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole history, e.g. from persisted state.
    pub fn seed(&mut self, reports: Vec<MissionReport>) {
        self.reports = reports;
    }

    pub fn push(&mut self, report: MissionReport) {
        self.reports.push(report);
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn last(&self) -> Option<&MissionReport> {
        self.reports.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissionReport> {
        self.reports.iter()
    }

    /// Highest generation recorded so far (0 when empty). New engines
    /// resume their generation counter from here.
    pub fn max_generation(&self) -> u32 {
        self.reports.iter().map(|r| r.generation).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(generation: u32, outcome: MissionOutcome) -> MissionReport {
        let planet = PlanetId::Mars.info();
        MissionReport {
            planet_id: planet.id,
            planet_name: planet.name.to_string(),
            generation,
            sensors: SensorSnapshot::from(&planet),
            protections: ProtectionDecision::default(),
            outcome,
            failure_reason: None,
            thresholds: ThresholdSnapshot::from(&PlanetKnowledge::default()),
        }
    }

    #[test]
    fn test_history_append_order() {
        let mut history = MissionHistory::new();
        history.push(report(1, MissionOutcome::Failure));
        history.push(report(2, MissionOutcome::Success));
        assert_eq!(history.len(), 2);
        let generations: Vec<u32> = history.iter().map(|r| r.generation).collect();
        assert_eq!(generations, vec![1, 2]);
        assert_eq!(history.last().unwrap().outcome, MissionOutcome::Success);
    }

    #[test]
    fn test_max_generation() {
        let mut history = MissionHistory::new();
        assert_eq!(history.max_generation(), 0);
        history.seed(vec![
            report(3, MissionOutcome::Failure),
            report(7, MissionOutcome::Success),
        ]);
        assert_eq!(history.max_generation(), 7);
    }

    #[test]
    fn test_snapshot_from_planet() {
        let earth = PlanetId::Earth.info();
        let snap = SensorSnapshot::from(&earth);
        assert!(snap.has_life);
        assert!((snap.humidity - 72.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_threshold_snapshot_tracks_knowledge() {
        let mut k = PlanetKnowledge::default();
        k.tighten_temperature(430.0);
        let snap = ThresholdSnapshot::from(&k);
        assert!((snap.temperature_threshold - 420.0).abs() < f32::EPSILON);
    }
}

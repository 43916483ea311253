//! Hazard evaluation — learned protections vs. absolute danger constants.
//!
//! Two different comparisons, deliberately asymmetric:
//! - a protection engages only when the reading is strictly *above* the
//!   learned threshold (equality does not engage),
//! - a reading *at or above* the danger constant already counts as exposed.

use serde::{Deserialize, Serialize};

use crate::knowledge::PlanetKnowledge;
use crate::planets::Planet;

/// The four hazard axes, in failure-precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Temperature,
    Radiation,
    Gravity,
    Humidity,
}

impl HazardKind {
    /// Precedence order used everywhere a single axis must win.
    pub const ALL: [HazardKind; 4] = [
        HazardKind::Temperature,
        HazardKind::Radiation,
        HazardKind::Gravity,
        HazardKind::Humidity,
    ];
}

/// Instantaneous sensor readings for one planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReadings {
    pub temperature_c: f32,
    pub radiation: f32,
    pub gravity_g: f32,
    pub humidity: f32,
}

impl SensorReadings {
    pub fn of(planet: &Planet) -> Self {
        Self {
            temperature_c: planet.temperature_c,
            radiation: planet.radiation,
            gravity_g: planet.gravity_g,
            humidity: planet.humidity,
        }
    }

    pub fn axis(&self, kind: HazardKind) -> f32 {
        match kind {
            HazardKind::Temperature => self.temperature_c,
            HazardKind::Radiation => self.radiation,
            HazardKind::Gravity => self.gravity_g,
            HazardKind::Humidity => self.humidity,
        }
    }
}

/// Absolute sensor levels considered objectively dangerous, independent of
/// anything learned. Static configuration, optionally overridden per planet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DangerProfile {
    pub temperature_c: f32,
    pub radiation: f32,
    pub gravity_g: f32,
    pub humidity: f32,
}

impl Default for DangerProfile {
    fn default() -> Self {
        Self {
            temperature_c: 80.0,
            radiation: 50.0,
            gravity_g: 1.5,
            humidity: 85.0,
        }
    }
}

impl DangerProfile {
    pub fn axis(&self, kind: HazardKind) -> f32 {
        match kind {
            HazardKind::Temperature => self.temperature_c,
            HazardKind::Radiation => self.radiation,
            HazardKind::Gravity => self.gravity_g,
            HazardKind::Humidity => self.humidity,
        }
    }

    /// Apply per-planet overrides on top of the defaults.
    pub fn with_overrides(mut self, overrides: &DangerOverrides) -> Self {
        if let Some(t) = overrides.temperature_c {
            self.temperature_c = t;
        }
        if let Some(r) = overrides.radiation {
            self.radiation = r;
        }
        if let Some(g) = overrides.gravity_g {
            self.gravity_g = g;
        }
        if let Some(h) = overrides.humidity {
            self.humidity = h;
        }
        self
    }
}

/// Partial per-planet danger overrides. `None` keeps the default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DangerOverrides {
    pub temperature_c: Option<f32>,
    pub radiation: Option<f32>,
    pub gravity_g: Option<f32>,
    pub humidity: Option<f32>,
}

/// Which protections the rover engages for this mission, derived from the
/// current learned thresholds. Ephemeral — recomputed every mission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionDecision {
    pub temperature: bool,
    pub radiation: bool,
    pub gravity: bool,
    pub humidity: bool,
    /// Reduced-footprint protocol, engaged whenever the planet hosts life.
    pub life_protocol: bool,
}

impl ProtectionDecision {
    pub fn axis(&self, kind: HazardKind) -> bool {
        match kind {
            HazardKind::Temperature => self.temperature,
            HazardKind::Radiation => self.radiation,
            HazardKind::Gravity => self.gravity,
            HazardKind::Humidity => self.humidity,
        }
    }
}

/// Result of one hazard evaluation: protections plus the hazards that
/// remain unmitigated (dangerous reading, protection inactive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardEvaluation {
    pub protections: ProtectionDecision,
    unmitigated: [bool; 4],
}

impl HazardEvaluation {
    pub fn is_unmitigated(&self, kind: HazardKind) -> bool {
        self.unmitigated[kind as usize]
    }

    pub fn any_unmitigated(&self) -> bool {
        self.unmitigated.iter().any(|&u| u)
    }

    /// The highest-precedence unmitigated hazard, if any.
    pub fn first_unmitigated(&self) -> Option<HazardKind> {
        HazardKind::ALL.into_iter().find(|&k| self.is_unmitigated(k))
    }
}

/// Evaluate one planet against the current knowledge. Pure — callable any
/// number of times per session without side effects.
pub fn evaluate(
    planet: &Planet,
    knowledge: &PlanetKnowledge,
    danger: &DangerProfile,
) -> HazardEvaluation {
    let sensors = SensorReadings::of(planet);

    // Strictly greater-than: a reading exactly at the threshold does not
    // engage the protection.
    let protections = ProtectionDecision {
        temperature: sensors.temperature_c > knowledge.temperature_threshold,
        radiation: sensors.radiation > knowledge.radiation_threshold,
        gravity: sensors.gravity_g > knowledge.gravity_threshold,
        humidity: sensors.humidity > knowledge.humidity_threshold,
        life_protocol: planet.has_life,
    };

    // At-or-above: a reading exactly at the danger constant already counts
    // as exposed.
    let mut unmitigated = [false; 4];
    for kind in HazardKind::ALL {
        unmitigated[kind as usize] =
            sensors.axis(kind) >= danger.axis(kind) && !protections.axis(kind);
    }

    HazardEvaluation {
        protections,
        unmitigated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planets::PlanetId;

    fn knowledge_with(temp: f32, rad: f32, grav: f32, hum: f32) -> PlanetKnowledge {
        PlanetKnowledge {
            temperature_threshold: temp,
            radiation_threshold: rad,
            gravity_threshold: grav,
            humidity_threshold: hum,
            failures: 0,
            successes: 0,
        }
    }

    #[test]
    fn test_lax_knowledge_engages_nothing() {
        let mercury = PlanetId::Mercury.info();
        let eval = evaluate(
            &mercury,
            &PlanetKnowledge::default(),
            &DangerProfile::default(),
        );
        assert!(!eval.protections.temperature);
        assert!(!eval.protections.radiation);
        assert!(!eval.protections.gravity);
        assert!(!eval.protections.humidity);
        // Temperature 430 and radiation 85 both exceed the danger constants.
        assert!(eval.is_unmitigated(HazardKind::Temperature));
        assert!(eval.is_unmitigated(HazardKind::Radiation));
        assert!(!eval.is_unmitigated(HazardKind::Gravity));
        assert!(!eval.is_unmitigated(HazardKind::Humidity));
        assert_eq!(eval.first_unmitigated(), Some(HazardKind::Temperature));
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        // Reading exactly at the learned threshold: protection stays off.
        let mercury = PlanetId::Mercury.info();
        let k = knowledge_with(430.0, 150.0, 10.0, 120.0);
        let eval = evaluate(&mercury, &k, &DangerProfile::default());
        assert!(!eval.protections.temperature);

        // One step below the reading: protection engages.
        let k = knowledge_with(429.9, 150.0, 10.0, 120.0);
        let eval = evaluate(&mercury, &k, &DangerProfile::default());
        assert!(eval.protections.temperature);
        assert!(!eval.is_unmitigated(HazardKind::Temperature));
    }

    #[test]
    fn test_danger_boundary_is_inclusive() {
        // Uranus radiation is exactly 50 — equal to the default danger
        // constant, so it already counts as exposed.
        let uranus = PlanetId::Uranus.info();
        let eval = evaluate(
            &uranus,
            &PlanetKnowledge::default(),
            &DangerProfile::default(),
        );
        assert!(eval.is_unmitigated(HazardKind::Radiation));
    }

    #[test]
    fn test_protection_suppresses_exposure() {
        let mercury = PlanetId::Mercury.info();
        let k = knowledge_with(420.0, 80.0, 10.0, 120.0);
        let eval = evaluate(&mercury, &k, &DangerProfile::default());
        assert!(eval.protections.temperature);
        assert!(eval.protections.radiation);
        assert!(!eval.any_unmitigated());
    }

    #[test]
    fn test_life_protocol_follows_catalog() {
        let earth = PlanetId::Earth.info();
        let eval = evaluate(
            &earth,
            &PlanetKnowledge::default(),
            &DangerProfile::default(),
        );
        assert!(eval.protections.life_protocol);

        let mars = PlanetId::Mars.info();
        let eval = evaluate(
            &mars,
            &PlanetKnowledge::default(),
            &DangerProfile::default(),
        );
        assert!(!eval.protections.life_protocol);
    }

    #[test]
    fn test_danger_overrides() {
        let danger = DangerProfile::default().with_overrides(&DangerOverrides {
            gravity_g: Some(1.2),
            radiation: Some(60.0),
            ..DangerOverrides::default()
        });
        assert!((danger.gravity_g - 1.2).abs() < f32::EPSILON);
        assert!((danger.radiation - 60.0).abs() < f32::EPSILON);
        // Untouched axes keep the defaults.
        assert!((danger.temperature_c - 80.0).abs() < f32::EPSILON);
        assert!((danger.humidity - 85.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let venus = PlanetId::Venus.info();
        let k = PlanetKnowledge::default();
        let danger = DangerProfile::default();
        let a = evaluate(&venus, &k, &danger);
        let b = evaluate(&venus, &k, &danger);
        assert_eq!(a, b);
        assert!(k.is_first_attempt(), "evaluation must not mutate knowledge");
    }
}

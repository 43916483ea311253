//! Learned per-planet knowledge — protection thresholds and mission tally.
//!
//! Thresholds start maximally permissive ("never protect") and move toward
//! the observed sensor value only when a mission fails on that axis. Success
//! never loosens a threshold. All writes are clamped so repeated extreme
//! readings cannot push persisted values out of range.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::planets::{PlanetId, ALL_PLANETS};

/// Initial ("lax") thresholds: no sensor reading in the catalog exceeds
/// these, so a fresh rover engages no protections anywhere.
pub mod lax {
    pub const TEMPERATURE: f32 = 999.0;
    pub const RADIATION: f32 = 150.0;
    pub const GRAVITY: f32 = 10.0;
    pub const HUMIDITY: f32 = 120.0;
}

/// Per-axis margin subtracted from the sensor reading when a failure
/// tightens a threshold.
pub mod margin {
    pub const TEMPERATURE: f32 = 10.0;
    pub const RADIATION: f32 = 5.0;
    pub const GRAVITY: f32 = 0.1;
    pub const HUMIDITY: f32 = 5.0;
}

/// Valid range for each threshold axis. The upper bound equals the lax
/// default, so a threshold can never exceed its starting permissiveness.
pub mod bounds {
    pub const TEMPERATURE: (f32, f32) = (-200.0, 999.0);
    pub const RADIATION: (f32, f32) = (-50.0, 150.0);
    pub const GRAVITY: (f32, f32) = (-5.0, 10.0);
    pub const HUMIDITY: (f32, f32) = (-50.0, 120.0);
}

/// Offsets applied when a no-surface mission teaches the rover to expect
/// no solid ground: gravity and radiation thresholds are pushed *permissive*
/// (never below their current value).
pub mod no_surface_offset {
    pub const GRAVITY: f32 = 1.0;
    pub const RADIATION: f32 = 20.0;
}

fn clamp_to(range: (f32, f32), value: f32) -> f32 {
    value.clamp(range.0, range.1)
}

/// What the rover has learned about one planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetKnowledge {
    pub temperature_threshold: f32,
    pub radiation_threshold: f32,
    pub gravity_threshold: f32,
    pub humidity_threshold: f32,
    pub failures: u32,
    pub successes: u32,
}

impl Default for PlanetKnowledge {
    fn default() -> Self {
        Self {
            temperature_threshold: lax::TEMPERATURE,
            radiation_threshold: lax::RADIATION,
            gravity_threshold: lax::GRAVITY,
            humidity_threshold: lax::HUMIDITY,
            failures: 0,
            successes: 0,
        }
    }
}

impl PlanetKnowledge {
    /// Total resolved missions on this planet.
    pub fn mission_count(&self) -> u32 {
        self.failures + self.successes
    }

    /// True until the first mission on this planet resolves.
    pub fn is_first_attempt(&self) -> bool {
        self.mission_count() == 0
    }

    /// Tighten the temperature threshold to the failing reading minus its
    /// margin. Hard set — used when this axis caused the failure.
    pub fn tighten_temperature(&mut self, sensor: f32) {
        self.temperature_threshold = clamp_to(bounds::TEMPERATURE, sensor - margin::TEMPERATURE);
    }

    pub fn tighten_radiation(&mut self, sensor: f32) {
        self.radiation_threshold = clamp_to(bounds::RADIATION, sensor - margin::RADIATION);
    }

    pub fn tighten_gravity(&mut self, sensor: f32) {
        self.gravity_threshold = clamp_to(bounds::GRAVITY, sensor - margin::GRAVITY);
    }

    pub fn tighten_humidity(&mut self, sensor: f32) {
        self.humidity_threshold = clamp_to(bounds::HUMIDITY, sensor - margin::HUMIDITY);
    }

    /// Tighten every axis at once, never loosening any of them. Used by the
    /// inexperience failure mode, where no single axis is implicated.
    pub fn tighten_all_monotonic(&mut self, temp: f32, rad: f32, grav: f32, hum: f32) {
        self.temperature_threshold = self
            .temperature_threshold
            .min(clamp_to(bounds::TEMPERATURE, temp - margin::TEMPERATURE));
        self.radiation_threshold = self
            .radiation_threshold
            .min(clamp_to(bounds::RADIATION, rad - margin::RADIATION));
        self.gravity_threshold = self
            .gravity_threshold
            .min(clamp_to(bounds::GRAVITY, grav - margin::GRAVITY));
        self.humidity_threshold = self
            .humidity_threshold
            .min(clamp_to(bounds::HUMIDITY, hum - margin::HUMIDITY));
    }

    /// Learn that a planet has no solid ground: push the gravity and
    /// radiation thresholds permissive by fixed offsets (never downward).
    pub fn relax_for_no_surface(&mut self, gravity: f32, radiation: f32) {
        self.gravity_threshold = clamp_to(
            bounds::GRAVITY,
            self.gravity_threshold.max(gravity + no_surface_offset::GRAVITY),
        );
        self.radiation_threshold = clamp_to(
            bounds::RADIATION,
            self.radiation_threshold
                .max(radiation + no_surface_offset::RADIATION),
        );
    }
}

/// The rover's whole learned memory: one [`PlanetKnowledge`] per catalog
/// planet. Owned by the engine; hazard evaluation reads it, outcome
/// resolution is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeStore {
    by_planet: HashMap<PlanetId, PlanetKnowledge>,
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeStore {
    /// Fresh store: every planet at lax defaults, zero counters.
    pub fn new() -> Self {
        let mut by_planet = HashMap::with_capacity(ALL_PLANETS.len());
        for id in ALL_PLANETS {
            by_planet.insert(id, PlanetKnowledge::default());
        }
        Self { by_planet }
    }

    /// Ensure every catalog planet has an entry. Deserialized stores may be
    /// partial (older saves, hand-edited files); missing planets get lax
    /// defaults and unknown entries are left alone.
    pub fn normalize(&mut self) {
        for id in ALL_PLANETS {
            self.by_planet.entry(id).or_default();
        }
    }

    pub fn get(&self, id: PlanetId) -> &PlanetKnowledge {
        self.by_planet
            .get(&id)
            .expect("knowledge store covers the whole catalog")
    }

    pub fn get_mut(&mut self, id: PlanetId) -> &mut PlanetKnowledge {
        self.by_planet.entry(id).or_default()
    }

    /// Drop everything learned and return to lax defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_lax() {
        let k = PlanetKnowledge::default();
        assert_eq!(k.temperature_threshold, lax::TEMPERATURE);
        assert_eq!(k.radiation_threshold, lax::RADIATION);
        assert_eq!(k.gravity_threshold, lax::GRAVITY);
        assert_eq!(k.humidity_threshold, lax::HUMIDITY);
        assert_eq!(k.mission_count(), 0);
        assert!(k.is_first_attempt());
    }

    #[test]
    fn test_tighten_sets_sensor_minus_margin() {
        let mut k = PlanetKnowledge::default();
        k.tighten_temperature(430.0);
        assert!((k.temperature_threshold - 420.0).abs() < f32::EPSILON);
        k.tighten_radiation(85.0);
        assert!((k.radiation_threshold - 80.0).abs() < f32::EPSILON);
        k.tighten_gravity(2.5);
        assert!((k.gravity_threshold - 2.4).abs() < 1e-5);
        k.tighten_humidity(90.0);
        assert!((k.humidity_threshold - 85.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_tighten_clamps_extremes() {
        let mut k = PlanetKnowledge::default();
        // Neptune-cold reading would land below the range floor.
        k.tighten_temperature(-200.0);
        assert_eq!(k.temperature_threshold, bounds::TEMPERATURE.0);
        k.tighten_humidity(-100.0);
        assert_eq!(k.humidity_threshold, bounds::HUMIDITY.0);
    }

    #[test]
    fn test_tighten_all_monotonic_never_loosens() {
        let mut k = PlanetKnowledge::default();
        k.tighten_temperature(100.0); // threshold now 90
        k.tighten_all_monotonic(500.0, 5.0, 0.9, 50.0);
        // 500 - 10 = 490 would loosen; must stay at 90.
        assert!((k.temperature_threshold - 90.0).abs() < f32::EPSILON);
        // The other axes tighten from lax.
        assert!((k.radiation_threshold - 0.0).abs() < f32::EPSILON);
        assert!((k.gravity_threshold - 0.8).abs() < 1e-5);
        assert!((k.humidity_threshold - 45.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_relax_for_no_surface_pushes_up_only() {
        let mut k = PlanetKnowledge::default();
        k.tighten_gravity(1.5); // threshold 1.4
        k.tighten_radiation(60.0); // threshold 55
        k.relax_for_no_surface(2.5, 70.0);
        assert!((k.gravity_threshold - 3.5).abs() < 1e-5);
        assert!((k.radiation_threshold - 90.0).abs() < f32::EPSILON);

        // Already-lax thresholds stay at their clamp ceiling.
        let mut fresh = PlanetKnowledge::default();
        fresh.relax_for_no_surface(2.5, 70.0);
        assert_eq!(fresh.gravity_threshold, lax::GRAVITY);
        assert_eq!(fresh.radiation_threshold, lax::RADIATION);
    }

    #[test]
    fn test_store_covers_catalog() {
        let store = KnowledgeStore::new();
        for id in ALL_PLANETS {
            assert!(store.get(id).is_first_attempt());
        }
    }

    #[test]
    fn test_normalize_fills_missing_planets() {
        let mut store = KnowledgeStore {
            by_planet: HashMap::new(),
        };
        store.normalize();
        for id in ALL_PLANETS {
            assert_eq!(*store.get(id), PlanetKnowledge::default());
        }
    }

    #[test]
    fn test_reset_restores_lax() {
        let mut store = KnowledgeStore::new();
        store.get_mut(PlanetId::Mercury).tighten_temperature(430.0);
        store.get_mut(PlanetId::Mercury).failures = 3;
        store.reset();
        assert_eq!(*store.get(PlanetId::Mercury), PlanetKnowledge::default());
    }
}

//! Per-planet exploration profiles — messages, goals, collection setup.
//!
//! Profiles are static configuration, distinct from both the immutable
//! catalog (sensor truth) and the learned knowledge (thresholds). They
//! shape how a mission on that planet *plays*: what the rover reports
//! while roaming, how far it must roam, and whether it gathers discrete
//! samples instead.

use crate::hazard::DangerOverrides;
use crate::planets::PlanetId;

/// Progress goal used when a profile does not set its own.
pub const DEFAULT_STEP_GOAL: f32 = 950.0;

/// Exploration cues used when a profile has no custom set.
pub const DEFAULT_EXPLORATION_MESSAGES: [&str; 3] = [
    "Escaneando terreno cercano...",
    "Registrando muestras...",
    "Analizando estructuras...",
];

/// Sample-collection mission mode: gather `sample_goal` discrete pickups
/// while unmitigated hazards drain health at `damage_per_second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionConfig {
    pub sample_goal: u32,
    pub damage_per_second: f32,
}

/// Static mission shaping for one planet.
#[derive(Debug, Clone, Default)]
pub struct PlanetProfile {
    /// Lines shown when the rover arrives, before free exploration.
    pub intro_messages: &'static [&'static str],
    /// Milestone cues emitted as exploration progress accumulates.
    pub exploration_messages: &'static [&'static str],
    /// Per-planet danger constant overrides.
    pub danger_overrides: DangerOverrides,
    /// Progress goal override (distance units).
    pub step_goal: Option<f32>,
    /// When set, the mission runs in collection mode instead of
    /// progress mode.
    pub collection: Option<CollectionConfig>,
}

impl PlanetProfile {
    pub fn step_goal(&self) -> f32 {
        self.step_goal.unwrap_or(DEFAULT_STEP_GOAL)
    }

    pub fn exploration_messages(&self) -> &'static [&'static str] {
        if self.exploration_messages.is_empty() {
            &DEFAULT_EXPLORATION_MESSAGES
        } else {
            self.exploration_messages
        }
    }
}

impl PlanetId {
    pub fn profile(&self) -> PlanetProfile {
        match self {
            Self::Mercury => PlanetProfile {
                intro_messages: &["Superficie rocosa y árida."],
                exploration_messages: &[
                    "Recolectando fragmentos de roca.",
                    "Midiendo radiación de superficie.",
                ],
                step_goal: Some(1100.0),
                collection: Some(CollectionConfig {
                    sample_goal: 10,
                    damage_per_second: 3.0,
                }),
                ..PlanetProfile::default()
            },
            Self::Venus => PlanetProfile {
                intro_messages: &["Atmósfera densa, visibilidad reducida."],
                exploration_messages: &[
                    "Sensores térmicos saturados, ajustando.",
                    "Buscando terreno estable.",
                ],
                step_goal: Some(1050.0),
                collection: Some(CollectionConfig {
                    sample_goal: 10,
                    damage_per_second: 4.0,
                }),
                ..PlanetProfile::default()
            },
            Self::Earth => PlanetProfile {
                intro_messages: &["Parámetros dentro de rango, procediendo a explorar."],
                exploration_messages: &[
                    "Recolectando muestras del suelo.",
                    "Midiendo humedad ambiental.",
                ],
                step_goal: Some(1000.0),
                ..PlanetProfile::default()
            },
            Self::Mars => PlanetProfile {
                intro_messages: &["Tormenta de polvo ligera detectada."],
                exploration_messages: &[
                    "Polvo rojo afecta la visibilidad.",
                    "Buscando compuestos orgánicos.",
                ],
                step_goal: Some(1150.0),
                ..PlanetProfile::default()
            },
            Self::Jupiter => PlanetProfile {
                intro_messages: &["Entorno gaseoso extremo, orbita controlada."],
                danger_overrides: DangerOverrides {
                    gravity_g: Some(1.2),
                    radiation: Some(60.0),
                    ..DangerOverrides::default()
                },
                ..PlanetProfile::default()
            },
            Self::Saturn => PlanetProfile {
                intro_messages: &["Anillos activos, trayectoria ajustada."],
                danger_overrides: DangerOverrides {
                    gravity_g: Some(1.1),
                    radiation: Some(55.0),
                    ..DangerOverrides::default()
                },
                ..PlanetProfile::default()
            },
            Self::Uranus => PlanetProfile {
                intro_messages: &["Atmósfera fría, sistemas en modo seguro."],
                danger_overrides: DangerOverrides {
                    radiation: Some(55.0),
                    ..DangerOverrides::default()
                },
                ..PlanetProfile::default()
            },
            Self::Neptune => PlanetProfile {
                intro_messages: &["Vientos supersónicos detectados."],
                danger_overrides: DangerOverrides {
                    radiation: Some(60.0),
                    ..DangerOverrides::default()
                },
                ..PlanetProfile::default()
            },
        }
    }

    /// Danger constants for this planet: defaults plus profile overrides.
    pub fn danger_profile(&self) -> crate::hazard::DangerProfile {
        crate::hazard::DangerProfile::default().with_overrides(&self.profile().danger_overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planets::ALL_PLANETS;

    #[test]
    fn test_collection_planets() {
        assert!(PlanetId::Mercury.profile().collection.is_some());
        assert!(PlanetId::Venus.profile().collection.is_some());
        for id in [
            PlanetId::Earth,
            PlanetId::Mars,
            PlanetId::Jupiter,
            PlanetId::Saturn,
            PlanetId::Uranus,
            PlanetId::Neptune,
        ] {
            assert!(id.profile().collection.is_none(), "{:?}", id);
        }
    }

    #[test]
    fn test_step_goal_fallback() {
        assert!((PlanetId::Earth.profile().step_goal() - 1000.0).abs() < f32::EPSILON);
        assert!((PlanetId::Jupiter.profile().step_goal() - DEFAULT_STEP_GOAL).abs() < f32::EPSILON);
    }

    #[test]
    fn test_exploration_message_fallback() {
        assert_eq!(
            PlanetId::Saturn.profile().exploration_messages(),
            &DEFAULT_EXPLORATION_MESSAGES
        );
        assert_eq!(PlanetId::Mars.profile().exploration_messages().len(), 2);
    }

    #[test]
    fn test_gas_giant_danger_overrides() {
        let jupiter = PlanetId::Jupiter.danger_profile();
        assert!((jupiter.gravity_g - 1.2).abs() < f32::EPSILON);
        assert!((jupiter.radiation - 60.0).abs() < f32::EPSILON);
        assert!((jupiter.temperature_c - 80.0).abs() < f32::EPSILON);

        let neptune = PlanetId::Neptune.danger_profile();
        assert!((neptune.radiation - 60.0).abs() < f32::EPSILON);
        assert!((neptune.gravity_g - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_every_planet_has_intro() {
        for id in ALL_PLANETS {
            assert!(!id.profile().intro_messages.is_empty(), "{:?}", id);
        }
    }
}

//! Planet catalog — the static environments the rover can visit.
//!
//! Catalog entries are fixed at compile time and never mutated; everything
//! the rover *learns* about a planet lives in [`crate::knowledge`] instead.

use serde::{Deserialize, Serialize};

/// Identifies one of the eight catalog planets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlanetId {
    Mercury = 0,
    Venus = 1,
    Earth = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
}

/// Every catalog planet, in display order.
pub const ALL_PLANETS: [PlanetId; 8] = [
    PlanetId::Mercury,
    PlanetId::Venus,
    PlanetId::Earth,
    PlanetId::Mars,
    PlanetId::Jupiter,
    PlanetId::Saturn,
    PlanetId::Uranus,
    PlanetId::Neptune,
];

/// Static catalog entry — sensor readings and classification flags.
#[derive(Debug, Clone, Copy)]
pub struct Planet {
    pub id: PlanetId,
    pub name: &'static str,
    /// Surface (or upper-atmosphere) temperature in °C.
    pub temperature_c: f32,
    /// Surface gravity in g.
    pub gravity_g: f32,
    /// Relative humidity, 0–100.
    pub humidity: f32,
    /// Radiation index, 0–100.
    pub radiation: f32,
    /// Whether the planet hosts life (engages the passive protocol).
    pub has_life: bool,
    /// Whether there is solid ground to land on.
    pub has_surface: bool,
}

impl PlanetId {
    pub fn info(&self) -> Planet {
        match self {
            Self::Mercury => Planet {
                id: Self::Mercury,
                name: "Mercurio",
                temperature_c: 430.0,
                gravity_g: 0.38,
                humidity: 0.0,
                radiation: 85.0,
                has_life: false,
                has_surface: true,
            },
            Self::Venus => Planet {
                id: Self::Venus,
                name: "Venus",
                temperature_c: 470.0,
                gravity_g: 0.9,
                humidity: 5.0,
                radiation: 90.0,
                has_life: false,
                has_surface: true,
            },
            Self::Earth => Planet {
                id: Self::Earth,
                name: "Tierra",
                temperature_c: 15.0,
                gravity_g: 1.0,
                humidity: 72.0,
                radiation: 5.0,
                has_life: true,
                has_surface: true,
            },
            Self::Mars => Planet {
                id: Self::Mars,
                name: "Marte",
                temperature_c: -60.0,
                gravity_g: 0.38,
                humidity: 10.0,
                radiation: 40.0,
                has_life: false,
                has_surface: true,
            },
            Self::Jupiter => Planet {
                id: Self::Jupiter,
                name: "Jupiter",
                temperature_c: -110.0,
                gravity_g: 2.5,
                humidity: 80.0,
                radiation: 70.0,
                has_life: false,
                has_surface: false,
            },
            Self::Saturn => Planet {
                id: Self::Saturn,
                name: "Saturno",
                temperature_c: -140.0,
                gravity_g: 1.07,
                humidity: 75.0,
                radiation: 60.0,
                has_life: false,
                has_surface: false,
            },
            Self::Uranus => Planet {
                id: Self::Uranus,
                name: "Urano",
                temperature_c: -195.0,
                gravity_g: 0.89,
                humidity: 60.0,
                radiation: 50.0,
                has_life: false,
                has_surface: false,
            },
            Self::Neptune => Planet {
                id: Self::Neptune,
                name: "Neptuno",
                temperature_c: -200.0,
                gravity_g: 1.14,
                humidity: 70.0,
                radiation: 55.0,
                has_life: false,
                has_surface: false,
            },
        }
    }

    /// Stable string key, used by external mission-start triggers.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Mercury => "MERCURY",
            Self::Venus => "VENUS",
            Self::Earth => "EARTH",
            Self::Mars => "MARS",
            Self::Jupiter => "JUPITER",
            Self::Saturn => "SATURN",
            Self::Uranus => "URANUS",
            Self::Neptune => "NEPTUNE",
        }
    }

    /// Parse a string key (case-insensitive). Returns `None` for unknown ids.
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_PLANETS
            .iter()
            .copied()
            .find(|id| id.key().eq_ignore_ascii_case(key.trim()))
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Mercury),
            1 => Some(Self::Venus),
            2 => Some(Self::Earth),
            3 => Some(Self::Mars),
            4 => Some(Self::Jupiter),
            5 => Some(Self::Saturn),
            6 => Some(Self::Uranus),
            7 => Some(Self::Neptune),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planet_id_roundtrip() {
        for i in 0..8u8 {
            let id = PlanetId::from_u8(i).unwrap();
            assert_eq!(id as u8, i);
        }
        assert!(PlanetId::from_u8(99).is_none());
    }

    #[test]
    fn test_key_roundtrip() {
        for id in ALL_PLANETS {
            assert_eq!(PlanetId::from_key(id.key()), Some(id));
        }
        assert_eq!(PlanetId::from_key("mercury"), Some(PlanetId::Mercury));
        assert_eq!(PlanetId::from_key("  VENUS "), Some(PlanetId::Venus));
        assert!(PlanetId::from_key("PLUTO").is_none());
    }

    #[test]
    fn test_catalog_values() {
        let mercury = PlanetId::Mercury.info();
        assert_eq!(mercury.name, "Mercurio");
        assert!((mercury.temperature_c - 430.0).abs() < f32::EPSILON);
        assert!((mercury.gravity_g - 0.38).abs() < f32::EPSILON);
        assert!(mercury.has_surface);
        assert!(!mercury.has_life);

        let earth = PlanetId::Earth.info();
        assert!(earth.has_life);
        assert!(earth.has_surface);
    }

    #[test]
    fn test_gas_giants_have_no_surface() {
        for id in [
            PlanetId::Jupiter,
            PlanetId::Saturn,
            PlanetId::Uranus,
            PlanetId::Neptune,
        ] {
            assert!(!id.info().has_surface, "{:?} should be gaseous", id);
        }
    }

    #[test]
    fn test_sensor_ranges() {
        for id in ALL_PLANETS {
            let p = id.info();
            assert!((0.0..=100.0).contains(&p.humidity), "{:?} humidity", id);
            assert!((0.0..=100.0).contains(&p.radiation), "{:?} radiation", id);
            assert!(p.gravity_g > 0.0, "{:?} gravity", id);
        }
    }
}

//! Mission outcome resolution — the learning rule.
//!
//! Runs exactly once per mission, at the transition out of active
//! exploration. This is the only code that writes to [`PlanetKnowledge`]:
//! failures tighten the implicated thresholds, successes only bump the
//! tally. The narrative output is display-only and deterministic.

use crate::hazard::{self, DangerProfile, HazardKind, ProtectionDecision, SensorReadings};
use crate::knowledge::PlanetKnowledge;
use crate::planets::Planet;

/// Why a mission failed. String values are wire-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Temperature,
    Radiation,
    Gravity,
    Humidity,
    /// First mission on a planet with no harder failure: inexperience
    /// itself is the failure mode, exactly once per planet.
    Inexperience,
    /// Landing attempted on a planet without solid ground, before the
    /// rover has learned to fly there.
    NoSurface,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperatura",
            Self::Radiation => "radiacion",
            Self::Gravity => "gravedad",
            Self::Humidity => "humedad",
            Self::Inexperience => "inexperiencia",
            Self::NoSurface => "sin superficie",
        }
    }
}

impl From<HazardKind> for FailureReason {
    fn from(kind: HazardKind) -> Self {
        match kind {
            HazardKind::Temperature => Self::Temperature,
            HazardKind::Radiation => Self::Radiation,
            HazardKind::Gravity => Self::Gravity,
            HazardKind::Humidity => Self::Humidity,
        }
    }
}

/// Locomotion/status tag consumed by the presentation collaborator. The
/// engine decides it; the renderer only maps it to visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Normal,
    Moving,
    /// Aerial hover mode on non-surfaced planets.
    Exploring,
    Burned,
    Irradiated,
    Broken,
    Shielded,
}

/// Everything the resolver decides for one mission.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub success: bool,
    pub failure_reason: Option<FailureReason>,
    /// Protections that were active during the mission (pre-mutation).
    pub protections: ProtectionDecision,
    /// Terminal status tag for the renderer.
    pub unit_status: UnitStatus,
    /// Ordered, display-only decision trail.
    pub narrative: Vec<String>,
}

/// Resolve one mission and apply the learning rule to `knowledge`.
///
/// Failure precedence, first match wins: unmitigated temperature →
/// radiation → gravity → humidity → inexperience (first attempt only) →
/// success. "First attempt" is snapshotted *before* the counters are
/// updated.
pub fn resolve(
    planet: &Planet,
    knowledge: &mut PlanetKnowledge,
    generation: u32,
    danger: &DangerProfile,
) -> Resolution {
    let sensors = SensorReadings::of(planet);
    let first_attempt = knowledge.is_first_attempt();

    let mut narrative = vec![
        format!("Gen {} | {}", generation, planet.name),
        format!(
            "Lecturas -> Temp: {}C | Rad: {} | Grav: {}g | Hum: {}%",
            sensors.temperature_c, sensors.radiation, sensors.gravity_g, sensors.humidity
        ),
    ];

    // No solid ground and nothing learned yet: the landing attempt itself
    // fails, and the rover learns to expect gas next time.
    if !planet.has_surface && first_attempt {
        knowledge.failures += 1;
        knowledge.relax_for_no_surface(sensors.gravity_g, sensors.radiation);
        narrative.push("No hay superficie solida. El dron aborta la maniobra y registra la falla.".into());
        narrative.push("Ajustando umbrales para futuras incursiones gaseosas.".into());
        return Resolution {
            success: false,
            failure_reason: Some(FailureReason::NoSurface),
            protections: ProtectionDecision {
                life_protocol: planet.has_life,
                ..ProtectionDecision::default()
            },
            unit_status: UnitStatus::Broken,
            narrative,
        };
    }

    if !planet.has_surface {
        narrative.push("No hay superficie solida. Exploracion en vuelo/sondas, sin aterrizar.".into());
    }

    let eval = hazard::evaluate(planet, knowledge, danger);
    let protections = eval.protections;

    narrative.push(if protections.temperature {
        format!(
            "Temperatura detectada {}C > umbral {}C. Activando proteccion termica.",
            sensors.temperature_c, knowledge.temperature_threshold
        )
    } else {
        "Temperatura dentro de rango seguro. No se activa proteccion termica.".into()
    });
    narrative.push(if protections.radiation {
        format!(
            "Radiacion detectada {} > umbral {}. Activando escudo.",
            sensors.radiation, knowledge.radiation_threshold
        )
    } else {
        "Radiacion dentro de rango seguro. No se activa escudo.".into()
    });
    narrative.push(if protections.gravity {
        format!(
            "Gravedad detectada {}g > umbral {}g. Ajustando estabilizadores.",
            sensors.gravity_g, knowledge.gravity_threshold
        )
    } else {
        "Gravedad dentro de rango seguro. Sin ajuste de estabilizadores.".into()
    });
    narrative.push(if protections.humidity {
        format!(
            "Humedad detectada {} > umbral {}. Sellando compartimentos.",
            sensors.humidity, knowledge.humidity_threshold
        )
    } else {
        "Humedad dentro de rango seguro. Sistemas estandar activos.".into()
    });

    let failure_reason = eval
        .first_unmitigated()
        .map(FailureReason::from)
        .or(if first_attempt {
            Some(FailureReason::Inexperience)
        } else {
            None
        });

    let Some(reason) = failure_reason else {
        knowledge.successes += 1;
        narrative.push("Exploracion completada sin daños. Conocimiento reforzado.".into());
        return Resolution {
            success: true,
            failure_reason: None,
            protections,
            unit_status: UnitStatus::Normal,
            narrative,
        };
    };

    knowledge.failures += 1;
    let unit_status = match reason {
        FailureReason::Temperature => {
            knowledge.tighten_temperature(sensors.temperature_c);
            narrative.push("La temperatura excede el limite y las ruedas se dañan.".into());
            UnitStatus::Burned
        }
        FailureReason::Radiation => {
            knowledge.tighten_radiation(sensors.radiation);
            narrative.push("La radiacion atraviesa los sistemas. Circuitos dañados.".into());
            UnitStatus::Irradiated
        }
        FailureReason::Gravity => {
            knowledge.tighten_gravity(sensors.gravity_g);
            narrative.push("La gravedad colapsa la estructura. Perdida de estabilidad.".into());
            UnitStatus::Broken
        }
        FailureReason::Humidity => {
            knowledge.tighten_humidity(sensors.humidity);
            narrative.push("La humedad ahoga los sensores. Sistemas en modo de emergencia.".into());
            UnitStatus::Shielded
        }
        FailureReason::Inexperience => {
            knowledge.tighten_all_monotonic(
                sensors.temperature_c,
                sensors.radiation,
                sensors.gravity_g,
                sensors.humidity,
            );
            narrative.push(
                "Falta de experiencia: los sistemas no reaccionan a tiempo. Falla registrada."
                    .into(),
            );
            narrative.push("Recalibrando umbrales para la siguiente generacion.".into());
            UnitStatus::Broken
        }
        FailureReason::NoSurface => unreachable!("handled before hazard comparison"),
    };

    narrative.push(if reason == FailureReason::Inexperience {
        "Mision fallida por falta de experiencia. Umbrales recalibrados para la siguiente generacion."
            .into()
    } else {
        format!(
            "Mision fallida por {}. Umbral actualizado para la siguiente generacion.",
            reason.as_str()
        )
    });

    Resolution {
        success: false,
        failure_reason: Some(reason),
        protections,
        unit_status,
        narrative,
    }
}

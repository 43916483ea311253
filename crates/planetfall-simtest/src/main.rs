//! Planetfall Headless Simulation Harness
//!
//! Validates the mission engine end to end without a renderer: learning
//! convergence on every planet, collection mode, destruction, persistence
//! and a seeded random-walk robustness sweep.
//!
//! Usage:
//!   cargo run -p planetfall-simtest
//!   cargo run -p planetfall-simtest -- --verbose

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use planetfall_engine::{
    EnginePhase, InMemoryStore, JsonFileStore, MemoryStore, MissionEngine,
};
use planetfall_logic::hazard::{self, DangerProfile, HazardKind};
use planetfall_logic::knowledge::{bounds, lax, KnowledgeStore, PlanetKnowledge};
use planetfall_logic::movement::DirectionalInput;
use planetfall_logic::outcome;
use planetfall_logic::planets::{PlanetId, ALL_PLANETS};
use planetfall_logic::report::{MissionOutcome, MissionReport};

const TICK_MS: f64 = 50.0;
const MISSION_CAP_MS: f64 = 300_000.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Planetfall Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Planet catalog sanity
    results.extend(validate_catalog(verbose));

    // 2. Knowledge thresholds and clamps
    results.extend(validate_knowledge(verbose));

    // 3. Hazard evaluation boundary sweep
    results.extend(validate_hazard_boundaries(verbose));

    // 4. Outcome precedence and the Mercury reference case
    results.extend(validate_outcome_rules(verbose));

    // 5. Learning convergence on every planet
    results.extend(validate_convergence(verbose));

    // 6. Collection mode and destruction
    results.extend(validate_collection_and_destruction(verbose));

    // 7. Persistence roundtrip and corruption recovery
    results.extend(validate_persistence(verbose));

    // 8. Random-walk robustness sweep
    results.extend(validate_random_walk(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Mission drivers ─────────────────────────────────────────────────────

/// Steer toward the pending sample in collection mode, sweep left/right
/// otherwise.
fn auto_input<S: MemoryStore>(engine: &MissionEngine<S>, t: f64) -> DirectionalInput {
    let Some(session) = engine.session() else {
        return DirectionalInput::IDLE;
    };
    if let Some((sx, sy)) = session.sample_position() {
        let (x, y) = session.position();
        return DirectionalInput {
            up: sy < y - 2.0,
            down: sy > y + 2.0,
            left: sx < x - 2.0,
            right: sx > x + 2.0,
        };
    }
    let phase = ((t / 2000.0) as u64) % 2;
    DirectionalInput {
        left: phase == 1,
        right: phase == 0,
        ..DirectionalInput::IDLE
    }
}

/// Run one full mission and return its report.
fn run_mission<S: MemoryStore>(
    engine: &mut MissionEngine<S>,
    id: PlanetId,
    mut driver: impl FnMut(&MissionEngine<S>, f64) -> DirectionalInput,
) -> Option<MissionReport> {
    engine.request_mission(id);
    engine.launch();
    if engine.phase() != EnginePhase::Exploring {
        return None;
    }
    let before = engine.history().len();
    let mut t = 0.0;
    while engine.phase() == EnginePhase::Exploring && t < MISSION_CAP_MS {
        let input = driver(engine, t);
        engine.tick(TICK_MS, input);
        t += TICK_MS;
    }
    if engine.phase() == EnginePhase::Exploring {
        // Random walks may never meet the goal: the abort path still owes
        // us exactly one report.
        engine.abort_mission();
    }
    if engine.history().len() == before + 1 {
        engine.history().last().cloned()
    } else {
        None
    }
}

// ── 1. Planet catalog ───────────────────────────────────────────────────

fn validate_catalog(verbose: bool) -> Vec<TestResult> {
    println!("--- Planet Catalog ---");
    let mut results = Vec::new();

    results.push(check(
        "catalog_size",
        ALL_PLANETS.len() == 8,
        format!("{} planets", ALL_PLANETS.len()),
    ));

    let bad: Vec<_> = ALL_PLANETS
        .iter()
        .filter(|id| {
            let p = id.info();
            !(0.0..=100.0).contains(&p.humidity)
                || !(0.0..=100.0).contains(&p.radiation)
                || p.gravity_g <= 0.0
        })
        .collect();
    results.push(check(
        "catalog_sensor_ranges",
        bad.is_empty(),
        if bad.is_empty() {
            "all readings in range".to_string()
        } else {
            format!("{} planets out of range", bad.len())
        },
    ));

    let gas_count = ALL_PLANETS.iter().filter(|id| !id.info().has_surface).count();
    results.push(check(
        "catalog_gas_giants",
        gas_count == 4,
        format!("{} non-surfaced planets", gas_count),
    ));

    let life: Vec<_> = ALL_PLANETS.iter().filter(|id| id.info().has_life).collect();
    results.push(check(
        "catalog_life",
        life.len() == 1 && life[0] == &PlanetId::Earth,
        "only Earth hosts life",
    ));

    if verbose {
        for id in ALL_PLANETS {
            let p = id.info();
            println!(
                "    {} temp={}C grav={}g hum={} rad={}",
                p.name, p.temperature_c, p.gravity_g, p.humidity, p.radiation
            );
        }
    }
    results
}

// ── 2. Knowledge ────────────────────────────────────────────────────────

fn validate_knowledge(_verbose: bool) -> Vec<TestResult> {
    println!("--- Knowledge & Clamps ---");
    let mut results = Vec::new();

    let fresh = PlanetKnowledge::default();
    results.push(check(
        "knowledge_lax_defaults",
        fresh.temperature_threshold == lax::TEMPERATURE
            && fresh.radiation_threshold == lax::RADIATION
            && fresh.gravity_threshold == lax::GRAVITY
            && fresh.humidity_threshold == lax::HUMIDITY,
        "fresh thresholds are lax",
    ));

    let mut k = PlanetKnowledge::default();
    k.tighten_temperature(-500.0);
    k.tighten_gravity(-500.0);
    results.push(check(
        "knowledge_clamp_floor",
        k.temperature_threshold == bounds::TEMPERATURE.0 && k.gravity_threshold == bounds::GRAVITY.0,
        format!(
            "extreme readings clamp to {} / {}",
            bounds::TEMPERATURE.0,
            bounds::GRAVITY.0
        ),
    ));

    let mut k = PlanetKnowledge::default();
    k.relax_for_no_surface(99.0, 999.0);
    results.push(check(
        "knowledge_clamp_ceiling",
        k.gravity_threshold == bounds::GRAVITY.1 && k.radiation_threshold == bounds::RADIATION.1,
        "no-surface relax cannot exceed lax ceilings",
    ));

    results
}

// ── 3. Hazard boundaries ────────────────────────────────────────────────

fn validate_hazard_boundaries(_verbose: bool) -> Vec<TestResult> {
    println!("--- Hazard Boundaries ---");
    let mut results = Vec::new();

    // Threshold comparison is strict: equality does not protect.
    let mercury = PlanetId::Mercury.info();
    let mut k = PlanetKnowledge::default();
    k.temperature_threshold = mercury.temperature_c;
    let eval = hazard::evaluate(&mercury, &k, &DangerProfile::default());
    results.push(check(
        "threshold_equality_no_protection",
        !eval.protections.temperature,
        "reading == threshold leaves protection off",
    ));

    // Danger comparison is inclusive: equality counts as exposed.
    let uranus = PlanetId::Uranus.info();
    let eval = hazard::evaluate(&uranus, &PlanetKnowledge::default(), &DangerProfile::default());
    results.push(check(
        "danger_equality_is_exposed",
        eval.is_unmitigated(HazardKind::Radiation),
        "radiation 50 == danger 50 counts as exposed",
    ));

    // Protection suppresses exposure.
    let mut k = PlanetKnowledge::default();
    k.tighten_temperature(mercury.temperature_c);
    k.tighten_radiation(mercury.radiation);
    let eval = hazard::evaluate(&mercury, &k, &DangerProfile::default());
    results.push(check(
        "protection_suppresses_exposure",
        !eval.any_unmitigated(),
        "fully protected Mercury has no unmitigated hazards",
    ));

    results
}

// ── 4. Outcome rules ────────────────────────────────────────────────────

fn validate_outcome_rules(_verbose: bool) -> Vec<TestResult> {
    println!("--- Outcome Rules ---");
    let mut results = Vec::new();

    // Mercury reference case: first mission ever.
    let mut store = KnowledgeStore::new();
    let mercury = PlanetId::Mercury.info();
    let res = outcome::resolve(
        &mercury,
        store.get_mut(PlanetId::Mercury),
        1,
        &PlanetId::Mercury.danger_profile(),
    );
    let k = store.get(PlanetId::Mercury);
    results.push(check(
        "mercury_reference_case",
        !res.success
            && res.failure_reason.map(|r| r.as_str()) == Some("temperatura")
            && (k.temperature_threshold - 420.0).abs() < f32::EPSILON
            && k.failures == 1,
        format!(
            "reason={:?} threshold={} failures={}",
            res.failure_reason.map(|r| r.as_str()),
            k.temperature_threshold,
            k.failures
        ),
    ));

    // First-attempt rule on a fully safe planet.
    let mut store = KnowledgeStore::new();
    let earth = PlanetId::Earth.info();
    let res = outcome::resolve(
        &earth,
        store.get_mut(PlanetId::Earth),
        1,
        &DangerProfile::default(),
    );
    results.push(check(
        "first_attempt_rule",
        res.failure_reason.map(|r| r.as_str()) == Some("inexperiencia"),
        "safe readings still fail once on inexperience",
    ));

    // Narrative determinism.
    let mut a = KnowledgeStore::new();
    let mut b = KnowledgeStore::new();
    let venus = PlanetId::Venus.info();
    let danger = PlanetId::Venus.danger_profile();
    let ra = outcome::resolve(&venus, a.get_mut(PlanetId::Venus), 5, &danger);
    let rb = outcome::resolve(&venus, b.get_mut(PlanetId::Venus), 5, &danger);
    results.push(check(
        "narrative_determinism",
        ra.narrative == rb.narrative,
        format!("{} identical lines", ra.narrative.len()),
    ));

    results
}

// ── 5. Learning convergence ─────────────────────────────────────────────

fn validate_convergence(verbose: bool) -> Vec<TestResult> {
    println!("--- Learning Convergence ---");
    let mut results = Vec::new();

    for id in ALL_PLANETS {
        let mut engine = MissionEngine::new(InMemoryStore::new());
        let mut generations = 0;
        let mut succeeded = false;

        for _ in 0..6 {
            generations += 1;
            match run_mission(&mut engine, id, auto_input) {
                Some(report) if report.outcome == MissionOutcome::Success => {
                    succeeded = true;
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }

        if verbose {
            let k = engine.knowledge().get(id);
            println!(
                "    {:?}: {} generations ({} failures, {} successes)",
                id, generations, k.failures, k.successes
            );
        }
        results.push(check(
            &format!("convergence_{}", id.key().to_lowercase()),
            succeeded,
            format!("SUCCESS after {} generations", generations),
        ));
    }

    results
}

// ── 6. Collection & destruction ─────────────────────────────────────────

fn validate_collection_and_destruction(_verbose: bool) -> Vec<TestResult> {
    println!("--- Collection & Destruction ---");
    let mut results = Vec::new();

    // A motionless rover on fresh Venus must be destroyed by exposure and
    // still deliver exactly one FAILURE report.
    let mut engine = MissionEngine::new(InMemoryStore::new());
    engine.request_mission(PlanetId::Venus);
    engine.launch();
    let mut t = 0.0;
    while engine.phase() == EnginePhase::Exploring && t < 120_000.0 {
        engine.tick(TICK_MS, DirectionalInput::IDLE);
        t += TICK_MS;
    }
    results.push(check(
        "destruction_guarantee",
        engine.history().len() == 1
            && engine.history().last().unwrap().outcome == MissionOutcome::Failure
            && engine.phase() == EnginePhase::Idle,
        format!(
            "{} report(s) after {:.1}s of exposure",
            engine.history().len(),
            t / 1000.0
        ),
    ));

    // With full experience, Mercury's collection run finishes unharmed.
    let mut engine = MissionEngine::new(InMemoryStore::new());
    let reason1 = run_mission(&mut engine, PlanetId::Mercury, auto_input).and_then(|r| r.failure_reason);
    let reason2 = run_mission(&mut engine, PlanetId::Mercury, auto_input).and_then(|r| r.failure_reason);
    let outcome3 = run_mission(&mut engine, PlanetId::Mercury, auto_input).map(|r| r.outcome);
    results.push(check(
        "collection_learns_then_succeeds",
        reason1.as_deref() == Some("temperatura")
            && reason2.as_deref() == Some("radiacion")
            && outcome3 == Some(MissionOutcome::Success),
        format!("{:?}, {:?}, then {:?}", reason1, reason2, outcome3),
    ));

    results
}

// ── 7. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let path = std::env::temp_dir().join(format!("planetfall-simtest-{}.json", std::process::id()));
    let _ = std::fs::remove_file(&path);

    // Fresh engine over a missing file, one mission, then a revived engine.
    {
        let mut engine = MissionEngine::new(JsonFileStore::new(&path));
        run_mission(&mut engine, PlanetId::Mars, auto_input);
    }
    let raw = std::fs::read_to_string(&path).unwrap_or_default();
    let parsed: Result<serde_json::Value, _> = serde_json::from_str(&raw);
    results.push(check(
        "snapshot_is_valid_json",
        parsed
            .as_ref()
            .map(|v| v.get("knowledge").is_some() && v.get("history").is_some())
            .unwrap_or(false),
        format!("{} bytes on disk", raw.len()),
    ));

    let revived = MissionEngine::new(JsonFileStore::new(&path));
    results.push(check(
        "snapshot_roundtrip",
        revived.history().len() == 1 && revived.knowledge().get(PlanetId::Mars).failures == 1,
        "revived engine sees the recorded mission",
    ));

    // Corruption recovery.
    std::fs::write(&path, "ceci n'est pas du json").ok();
    let recovered = MissionEngine::new(JsonFileStore::new(&path));
    results.push(check(
        "corruption_recovery",
        recovered.history().is_empty()
            && recovered.knowledge().get(PlanetId::Mars).is_first_attempt(),
        "corrupt file falls back to fresh knowledge",
    ));

    let _ = std::fs::remove_file(&path);
    results
}

// ── 8. Random-walk robustness ───────────────────────────────────────────

fn validate_random_walk(verbose: bool) -> Vec<TestResult> {
    println!("--- Random-Walk Sweep ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(0x504c414e);
    let mut engine = MissionEngine::new(InMemoryStore::new());
    let mut report_count = 0usize;
    let missions = 24usize;

    for i in 0..missions {
        let id = ALL_PLANETS[rng.gen_range(0..ALL_PLANETS.len())];
        let report = run_mission(&mut engine, id, |_, _| DirectionalInput {
            up: rng.gen_bool(0.3),
            down: rng.gen_bool(0.3),
            left: rng.gen_bool(0.4),
            right: rng.gen_bool(0.4),
        });
        if report.is_some() {
            report_count += 1;
        }
        if verbose {
            if let Some(r) = engine.history().last() {
                println!(
                    "    #{:02} {:?} gen={} outcome={:?} reason={:?}",
                    i, r.planet_id, r.generation, r.outcome, r.failure_reason
                );
            }
        }
    }

    results.push(check(
        "one_report_per_mission",
        report_count == missions && engine.history().len() == missions,
        format!("{}/{} missions reported", report_count, missions),
    ));

    let generations: Vec<u32> = engine.history().iter().map(|r| r.generation).collect();
    let monotonic = generations.windows(2).all(|w| w[1] == w[0] + 1);
    results.push(check(
        "generations_monotonic",
        monotonic,
        format!("generations 1..={}", generations.len()),
    ));

    // Persisted thresholds always stay inside their clamp ranges.
    let in_range = ALL_PLANETS.iter().all(|&id| {
        let k = engine.knowledge().get(id);
        (bounds::TEMPERATURE.0..=bounds::TEMPERATURE.1).contains(&k.temperature_threshold)
            && (bounds::RADIATION.0..=bounds::RADIATION.1).contains(&k.radiation_threshold)
            && (bounds::GRAVITY.0..=bounds::GRAVITY.1).contains(&k.gravity_threshold)
            && (bounds::HUMIDITY.0..=bounds::HUMIDITY.1).contains(&k.humidity_threshold)
    });
    results.push(check(
        "thresholds_in_range",
        in_range,
        "all learned thresholds within clamp bounds",
    ));

    // On surfaced planets thresholds only ever tighten.
    let mut monotone = true;
    for &id in ALL_PLANETS.iter().filter(|id| id.info().has_surface) {
        let snapshots: Vec<_> = engine
            .history()
            .iter()
            .filter(|r| r.planet_id == id)
            .map(|r| r.thresholds)
            .collect();
        for pair in snapshots.windows(2) {
            monotone &= pair[1].temperature_threshold <= pair[0].temperature_threshold
                && pair[1].radiation_threshold <= pair[0].radiation_threshold
                && pair[1].gravity_threshold <= pair[0].gravity_threshold
                && pair[1].humidity_threshold <= pair[0].humidity_threshold;
        }
    }
    results.push(check(
        "thresholds_monotone_on_surfaced",
        monotone,
        "no threshold ever loosened on a surfaced planet",
    ));

    results
}

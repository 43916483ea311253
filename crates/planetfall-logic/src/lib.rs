//! Pure mission logic for Planetfall.
//!
//! This crate contains all simulation rules that are independent of any
//! runtime, renderer, or storage backend. Functions take plain data and
//! return results, making them unit-testable and portable between the
//! live engine and the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`planets`] | Static planet catalog (sensor readings, life/surface flags) |
//! | [`knowledge`] | Learned per-planet thresholds, mission tally, clamped mutation |
//! | [`hazard`] | Protection decisions vs. danger constants (pure evaluation) |
//! | [`outcome`] | Mission resolution, failure precedence, the learning rule |
//! | [`profiles`] | Per-planet mission shaping (messages, goals, collection mode) |
//! | [`movement`] | Bounded rover movement and speed scaling |
//! | [`report`] | Immutable mission reports and history |

pub mod hazard;
pub mod knowledge;
pub mod movement;
pub mod outcome;
pub mod planets;
pub mod profiles;
pub mod report;

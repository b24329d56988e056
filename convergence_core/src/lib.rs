//! Prop Convergence Core - sport-aware multi-factor scoring for player props.
//!
//! This module provides:
//! - Nine universal factor scorers (trend, season, matchup, rest, ...)
//! - Per-sport factor sets and weights for NBA, MLB and NFL
//! - Convergence routing with a weighted lean, confidence and tier
//! - Display verdicts in weight-aware and legacy modes
//! - What-if simulation over hypothetical input changes
//! - HeatCheck slate scanning with rayon
//! - Input provider traits, concurrent gathering and a TTL cache

pub mod cache;
pub mod config;
pub mod convergence;
pub mod error;
pub mod factors;
pub mod heatcheck;
pub mod models;
pub mod providers;
pub mod sports;
pub mod utils;
pub mod venues;
pub mod verdict;
pub mod weather;
pub mod what_if;

pub use convergence::{compute_lean, evaluate, ConvergenceEngine, ConvergenceResult, PropRequest};
pub use error::{ConfigError, ProviderError};
pub use heatcheck::{scan_slate, HeatCheckCandidate, HeatCheckPick, Trend};
pub use models::*;
pub use sports::{SportFactorProvider, SportProviderRegistry};
pub use verdict::{synthesize_verdict, PersistedVerdict, Verdict, VerdictInput, VerdictMode};
pub use what_if::{simulate, Modification, WhatIfResult};

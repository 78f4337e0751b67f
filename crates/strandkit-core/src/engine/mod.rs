//! # Engine Module
//!
//! This module implements the all-atom generation engine: the machinery that
//! expands an edited coarse-grained structure into a bonded atomic model.
//!
//! ## Overview
//!
//! Generation runs in fixed passes. A sizing pass walks every monomer once,
//! resolves and validates the fragments the run will need, and computes exact
//! output totals. The projected atom count is checked against a process-wide
//! ceiling before any buffer is allocated. A placement pass then rigidly
//! transforms each fragment to its monomer's stored frame, a refinement pass
//! locally adjusts nucleic backbone torsions toward ideal linkage geometry,
//! and finalization adds inter-residue bonds and secondary structure.
//!
//! ## Architecture
//!
//! - **Generation** ([`generation`]) - The sizing and placement passes and
//!   `Structure::build_atomic_model`, the cached entry point
//! - **Limits** ([`limits`]) - The process-wide generated-atom ceiling
//! - **Progress Monitoring** ([`events`]) - Per-phase progress notifications
//! - **Error Handling** ([`error`]) - Failures that abort a run

pub mod error;
pub mod events;
pub(crate) mod finalize;
pub mod generation;
pub mod limits;
pub(crate) mod refine;

//! # StrandKit Core Library
//!
//! A library for coarse-grained modeling of DNA, RNA and protein polymers with
//! on-demand reconstruction of all-atom detail.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict two-layer architecture to keep the
//! editable coarse model independent of how atomic detail is produced from it.
//!
//! - **[`core`]: The Foundation.** Contains the coarse-grained data model
//!   (`Structure`, strands and chains over columnar monomer stores), the
//!   reference fragment library, and geometry utilities. Everything here is
//!   plain state: editing a structure never triggers atom generation, it only
//!   marks the cached model stale.
//!
//! - **[`engine`]: The Generation Core.** Turns a coarse structure into a
//!   fully bonded [`core::models::atomic::AtomicModel`] in fixed passes:
//!   exact sizing against a process-wide atom ceiling, rigid fragment
//!   placement, local backbone torsion refinement, and finalization of
//!   linkage bonds and secondary structure. Results are cached on the
//!   structure and reused until the next edit.

pub mod core;
pub mod engine;

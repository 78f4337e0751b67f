//! # Core Module
//!
//! This module provides the coarse-grained data model that the rest of the
//! library edits and reads, together with the reference data needed to expand
//! it into atoms.
//!
//! ## Overview
//!
//! A structure is a collection of nucleic acid strands and amino acid chains.
//! Each polymer stores its monomers in columnar buffers indexed by chain
//! position, so strand-level edits (insertion, splitting, circularization)
//! are plain buffer operations and iteration over one attribute touches only
//! that attribute's memory. Monomers carry stable global ids for
//! relationships that must survive reshuffling, such as base pairing.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Structures, polymers, monomer
//!   stores, handles and views, and the generated atomic model types
//! - **Reference Fragments** ([`fragments`]) - Per-monomer all-atom templates
//!   loaded from TOML libraries
//! - **Geometry** ([`utils`]) - Bounding boxes, principal axes, and the
//!   rotation bases used for fragment placement

pub mod fragments;
pub mod models;
pub mod utils;

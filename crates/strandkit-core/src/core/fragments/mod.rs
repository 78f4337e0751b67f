//! Reference fragment templates and the TOML-backed library that loads and
//! validates them.

pub mod fragment;
pub mod library;

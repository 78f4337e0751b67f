//! Data structures for the coarse-grained model and its generated atomic
//! counterpart.
//!
//! The aggregate root is [`structure::Structure`]; all topology edits go
//! through it. Polymers ([`polymer`]) own columnar monomer stores ([`store`]),
//! which callers read and write through per-row views ([`proxy`]). The
//! engine's output types live in [`atomic`].

pub mod atomic;
pub mod ids;
pub mod polymer;
pub mod proxy;
pub mod store;
pub mod structure;
pub mod types;

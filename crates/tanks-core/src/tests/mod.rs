//! Crate-level tests of the full tick pipeline.
//!
//! # Test Structure
//!
//! - `helpers.rs`: scenario setup and state accessors
//! - `integration.rs`: end-to-end behaviour of tanks, bots, shells and props
//! - `determinism.rs`: same seed and inputs give the same world
//! - `properties.rs`: `proptest` invariants (speed cap, overlap, ordering)

mod determinism;
mod helpers;
mod integration;

pub use helpers::*;

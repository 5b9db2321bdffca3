//! # Rigidfrag Core Library
//!
//! Rigid-body constraints for molecular simulation: bodies whose internal
//! geometry is held fixed by bond lengths, optionally carrying extra atoms
//! (virtual sites) whose positions are linear combinations of the rigid atoms.
//!
//! ## Architectural Philosophy
//!
//! The library keeps stateless definitions apart from the code that drives
//! them over a simulation.
//!
//! - **[`core`]: The Foundation.** Dense Gauss-Jordan linear algebra, the
//!   models a constraint reads and writes (`FragmentTemplate`, `Boundary`,
//!   `SimulationBox`), the `RigidConstraint` itself with its relaxation and
//!   force redistribution, and the TOML fragment loader.
//!
//! - **[`engine`]: The Driver.** Builds constraints for every fragment in a
//!   registry and applies them to whole blocks of molecules, in parallel when
//!   the `parallel` feature is enabled.

pub mod core;
pub mod engine;

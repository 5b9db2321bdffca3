//! # Core Module
//!
//! Stateless building blocks: dense linear algebra, the models of the
//! simulation state the constraints act on, the constraints themselves, and
//! the loader for fragment definitions.
//!
//! - **Linear Algebra** ([`linalg`]) - Pivoted Gauss-Jordan inversion and solve
//! - **Models** ([`models`]) - Fragment templates, boundaries, and the simulation box
//! - **Constraints** ([`constraint`]) - Rigid-fragment setup, relaxation, and force redistribution
//! - **File I/O** ([`io`]) - TOML fragment definitions

pub mod constraint;
pub mod io;
pub mod linalg;
pub mod models;

//! # Rigid Constraint Module
//!
//! Keeps rigid molecular fragments rigid during time integration.
//!
//! A [`RigidConstraint`] is built once per species from its reference
//! conformation. The *rigid atoms* are integrated like any other atom and
//! carry the body's six degrees of freedom; *extra atoms* (virtual sites such
//! as the M site of four-site water) are rigged to them through affine
//! coefficients derived at construction.
//!
//! Within each integration step the constraint is used twice:
//!
//! 1. [`RigidConstraint::relax_molecules`] after the rigid atoms move, which
//!    re-places the extra atoms;
//! 2. [`RigidConstraint::redistribute_forces`] after forces are evaluated,
//!    which moves the extra atoms' forces onto the rigid atoms as a
//!    translational plus a rotational contribution.

mod coefficients;
mod dynamics;
pub mod error;
pub mod rigid;
pub mod topology;

pub use error::ConstraintError;
pub use rigid::{ExtraSite, RigidConstraint};
pub use topology::Topology;

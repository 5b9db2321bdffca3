//! # Models Module
//!
//! The collaborators a constraint reads from and writes to:
//!
//! - [`template`] - Reference conformation and masses of a species
//! - [`boundary`] - Open or periodic boundaries and the minimum-image operation
//! - [`sim_box`] - Per-atom positions of every molecule in a simulation
//!
//! Atoms are stored in contiguous arrays and addressed by index; there are no
//! per-atom objects.

pub mod boundary;
pub mod sim_box;
pub mod template;

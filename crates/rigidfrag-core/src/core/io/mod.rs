//! Loading of rigid fragment definitions.
//!
//! Fragment files are TOML tables keyed by species name; each table lists
//! the template atoms, the rigid atoms with their bond lengths, and any extra
//! atoms. Unknown keys are rejected so a misspelled field fails to load.

pub mod fragments;

//! # Engine Module
//!
//! Applies rigid constraints across a whole simulation rather than one
//! molecule at a time.
//!
//! - [`setup`] builds every constraint named in a fragment registry.
//! - [`blocks`] runs relaxation and force redistribution over a contiguous
//!   block of molecules of one species, in parallel over molecules when the
//!   `parallel` feature is enabled.

pub mod blocks;
pub mod error;
pub mod setup;

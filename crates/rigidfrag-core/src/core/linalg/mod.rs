//! # Linear Algebra Module
//!
//! Dense, row-major matrices with in-place pivoted Gauss-Jordan elimination.
//!
//! Only the handful of operations the constraint code relies on are provided:
//! inversion and augmented solve, vector transform, transpose and right
//! multiplication. Small fixed-size geometry (points, vectors, cross products)
//! uses `nalgebra` directly.

pub mod matrix;

pub use matrix::{DenseMatrix, DenseMatrixView, Matrix, MatrixError};

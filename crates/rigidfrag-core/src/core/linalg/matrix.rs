use nalgebra::Matrix3;
use std::convert::Infallible;
use std::ops::{Index, IndexMut};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Storage of length {actual} cannot back a {rows}x{cols} matrix")]
    StorageSize {
        rows: usize,
        cols: usize,
        actual: usize,
    },
    #[error("Pivot {pivot:e} in column {column} is below tolerance; the matrix is (nearly) singular")]
    Singular { column: usize, pivot: f64 },
}

/// A dense, row-major matrix of `f64` values.
///
/// The storage parameter decides ownership: [`DenseMatrix`] owns a `Vec<f64>`,
/// while [`DenseMatrixView`] borrows caller storage mutably for its lifetime.
/// Both carry a private scratch row used by [`Matrix::transform`] and
/// [`Matrix::multiply_accumulate_right`], so those take `&mut self`.
#[derive(Debug, Clone)]
pub struct Matrix<S> {
    rows: usize,
    cols: usize,
    data: S,
    scratch: Vec<f64>,
}

/// A matrix that owns its storage.
pub type DenseMatrix = Matrix<Vec<f64>>;

/// A matrix over caller-owned row-major storage.
pub type DenseMatrixView<'a> = Matrix<&'a mut [f64]>;

impl DenseMatrix {
    /// Creates a zero-filled `rows x cols` matrix.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "matrix dimensions must be positive, got {rows}x{cols}"
        );
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
            scratch: vec![0.0; rows],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::new(n, n);
        for i in 0..n {
            matrix.data[i * n + i] = 1.0;
        }
        matrix
    }

    /// Builds a matrix from fixed-width rows, e.g. an augmented `[A | b]` system.
    ///
    /// # Panics
    ///
    /// Panics if `rows` is empty or `C` is zero.
    pub fn from_rows<const C: usize>(rows: &[[f64; C]]) -> Self {
        let mut matrix = Self::new(rows.len(), C);
        matrix.set_rows(rows);
        matrix
    }
}

impl From<Matrix3<f64>> for DenseMatrix {
    fn from(m: Matrix3<f64>) -> Self {
        Self::from_rows(&[
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ])
    }
}

impl<'a> DenseMatrixView<'a> {
    /// Wraps `storage` as a `rows x cols` row-major matrix without copying.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::StorageSize`] if either dimension is zero or the
    /// storage length is not exactly `rows * cols`.
    pub fn new(rows: usize, cols: usize, storage: &'a mut [f64]) -> Result<Self, MatrixError> {
        if rows == 0 || cols == 0 || storage.len() != rows * cols {
            return Err(MatrixError::StorageSize {
                rows,
                cols,
                actual: storage.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: storage,
            scratch: vec![0.0; rows],
        })
    }
}

impl<S> Matrix<S>
where
    S: AsRef<[f64]> + AsMut<[f64]>,
{
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// True for a packed linear system `[A | b]`.
    pub fn is_augmented(&self) -> bool {
        self.cols > self.rows
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data.as_ref()[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data.as_mut()[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data.as_ref()[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        self.data.as_ref()
    }

    pub fn is_finite(&self) -> bool {
        self.data.as_ref().iter().all(|v| v.is_finite())
    }

    /// Copies every entry of an equally shaped matrix into `self`.
    pub fn assign<T: AsRef<[f64]>>(&mut self, other: &Matrix<T>) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        self.data.as_mut().copy_from_slice(other.data.as_ref());
    }

    /// Overwrites every entry from row-major `rows` of the same shape.
    pub fn set_rows<R: AsRef<[f64]>>(&mut self, rows: &[R]) {
        debug_assert_eq!(rows.len(), self.rows);
        let cols = self.cols;
        let data = self.data.as_mut();
        for (i, row) in rows.iter().enumerate() {
            data[i * cols..(i + 1) * cols].copy_from_slice(&row.as_ref()[..cols]);
        }
    }

    /// Applies the matrix to `vector` in place.
    ///
    /// The first `cols` entries are read and the first `rows` entries are
    /// overwritten, so `vector` needs room for `max(rows, cols)` values.
    pub fn transform(&mut self, vector: &mut [f64]) {
        let (rows, cols) = (self.rows, self.cols);
        let data = self.data.as_ref();
        for i in 0..rows {
            self.scratch[i] = data[i * cols..(i + 1) * cols]
                .iter()
                .zip(&vector[..cols])
                .map(|(a, v)| a * v)
                .sum();
        }
        vector[..rows].copy_from_slice(&self.scratch);
    }

    /// Transposes a square matrix in place.
    pub fn transpose(&mut self) {
        debug_assert!(self.is_square(), "transpose requires a square matrix");
        let n = self.rows;
        let data = self.data.as_mut();
        for i in 0..n {
            for j in (i + 1)..n {
                data.swap(i * n + j, j * n + i);
            }
        }
    }

    /// `self = self * other` for square matrices of equal dimension.
    pub fn multiply_accumulate_right<T: AsRef<[f64]>>(&mut self, other: &Matrix<T>) {
        debug_assert!(self.is_square() && other.rows == self.rows && other.cols == self.rows);
        let n = self.rows;
        let rhs = other.data.as_ref();
        let data = self.data.as_mut();
        for i in 0..n {
            for j in 0..n {
                self.scratch[j] = (0..n).map(|k| data[i * n + k] * rhs[k * n + j]).sum();
            }
            data[i * n..(i + 1) * n].copy_from_slice(&self.scratch);
        }
    }

    /// Inverts a square matrix in place, or solves an augmented system.
    ///
    /// For a square matrix `A` the storage is replaced by `A⁻¹`. For an
    /// augmented matrix `[A | b]` the left block becomes the identity and the
    /// trailing columns hold `x` with `A x = b`.
    ///
    /// Uses Gauss-Jordan elimination with partial pivoting. A (near-)zero
    /// pivot is not detected: it propagates `inf`/`nan` into the result. Use
    /// [`Matrix::try_invert`] when the input may be degenerate.
    pub fn invert(&mut self) {
        let Ok(()) = self.eliminate(|_, _| Ok::<(), Infallible>(()));
    }

    /// Like [`Matrix::invert`], but rejects any pivot whose magnitude is at or
    /// below `tolerance` times the largest magnitude in the left block.
    ///
    /// On error the matrix contents are unspecified.
    pub fn try_invert(&mut self, tolerance: f64) -> Result<(), MatrixError> {
        let threshold = tolerance * self.max_abs_coefficient();
        self.eliminate(|column, pivot| {
            if pivot.is_nan() || pivot.abs() <= threshold {
                Err(MatrixError::Singular { column, pivot })
            } else {
                Ok(())
            }
        })
    }

    fn max_abs_coefficient(&self) -> f64 {
        let n = self.rows;
        (0..n)
            .flat_map(|i| self.row(i)[..n].iter())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Runs the elimination, handing every chosen pivot to `accept_pivot`
    /// before it is used; the first rejection aborts with that error.
    fn eliminate<E>(
        &mut self,
        mut accept_pivot: impl FnMut(usize, f64) -> Result<(), E>,
    ) -> Result<(), E> {
        debug_assert!(
            self.cols >= self.rows,
            "elimination needs at least as many columns as rows"
        );
        let n = self.rows;
        let m = self.cols;
        let mut inverse = (n == m).then(|| DenseMatrix::identity(n).data);
        let a = self.data.as_mut();

        // Forward pass: pick the pivot, normalise its row, clear the column below.
        for i in 0..n {
            let mut prow = i;
            let mut pmax = a[i * m + i].abs();
            for j in (i + 1)..n {
                let candidate = a[j * m + i].abs();
                if candidate > pmax {
                    prow = j;
                    pmax = candidate;
                }
            }
            accept_pivot(i, a[prow * m + i])?;

            if prow != i {
                swap_rows(a, m, i, prow);
                if let Some(b) = inverse.as_mut() {
                    swap_rows(b, n, i, prow);
                }
            }

            let pivot = a[i * m + i];
            for k in i..m {
                a[i * m + k] /= pivot;
            }
            if let Some(b) = inverse.as_mut() {
                for k in 0..n {
                    b[i * n + k] /= pivot;
                }
            }

            for j in (i + 1)..n {
                let factor = a[j * m + i];
                if factor == 0.0 {
                    continue;
                }
                subtract_scaled_row(a, m, j, i, factor, i);
                if let Some(b) = inverse.as_mut() {
                    subtract_scaled_row(b, n, j, i, factor, 0);
                }
            }
        }

        // Backward pass: clear each pivot column above the diagonal, last pivot first.
        for i in (0..n).rev() {
            for j in 0..i {
                let factor = a[j * m + i];
                if factor == 0.0 {
                    continue;
                }
                subtract_scaled_row(a, m, j, i, factor, i);
                if let Some(b) = inverse.as_mut() {
                    subtract_scaled_row(b, n, j, i, factor, 0);
                }
            }
        }

        if let Some(b) = inverse {
            a.copy_from_slice(&b);
        }
        Ok(())
    }
}

#[inline]
fn swap_rows(data: &mut [f64], width: usize, r1: usize, r2: usize) {
    for k in 0..width {
        data.swap(r1 * width + k, r2 * width + k);
    }
}

/// `row[target] -= factor * row[source]`, for columns `from..width`.
#[inline]
fn subtract_scaled_row(
    data: &mut [f64],
    width: usize,
    target: usize,
    source: usize,
    factor: f64,
    from: usize,
) {
    for k in from..width {
        let v = data[source * width + k];
        data[target * width + k] -= factor * v;
    }
}

impl<S: AsRef<[f64]>> Index<(usize, usize)> for Matrix<S> {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data.as_ref()[row * self.cols + col]
    }
}

impl<S: AsRef<[f64]> + AsMut<[f64]>> IndexMut<(usize, usize)> for Matrix<S> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data.as_mut()[row * self.cols + col]
    }
}

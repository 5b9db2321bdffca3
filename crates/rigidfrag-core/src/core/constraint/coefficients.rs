use super::error::ConstraintError;
use crate::core::linalg::DenseMatrix;
use nalgebra::{Point3, Vector3};

/// Residual below which a collinearity or coplanarity check always passes.
const ABSOLUTE_TOLERANCE: f64 = 1e-6;
/// Residual, relative to the displacement being checked, that also passes.
const RELATIVE_TOLERANCE: f64 = 1e-9;
/// Pivot tolerance (relative to the largest basis entry) for the skeleton basis.
const BASIS_PIVOT_TOLERANCE: f64 = 1e-9;

/// Derives the affine coefficients of each extra atom from reference positions.
///
/// `rigid` holds the reference positions of the rigid atoms in order;
/// `extras` pairs each extra atom's template index with its reference position.
/// Every returned vector has one entry per rigid atom and sums to 1.
pub(crate) fn derive(
    rigid: &[Point3<f64>],
    extras: &[(usize, Point3<f64>)],
) -> Result<Vec<Vec<f64>>, ConstraintError> {
    match rigid {
        [r0, r1] => extras
            .iter()
            .map(|(index, re)| linear(*index, r0, r1, re))
            .collect(),
        [r0, r1, r2] => {
            let mut basis = planar_basis(r0, r1, r2)?;
            extras
                .iter()
                .map(|(index, re)| planar(&mut basis, *index, r0, re))
                .collect()
        }
        [r0, r1, r2, r3] => {
            let mut basis = spatial_basis(r0, r1, r2, r3)?;
            Ok(extras
                .iter()
                .map(|(_, re)| spatial(&mut basis, r0, re))
                .collect())
        }
        _ => Err(ConstraintError::ExtraAtomsNotFullyRigid),
    }
}

fn within_tolerance(residual: f64, scale: f64) -> bool {
    residual <= ABSOLUTE_TOLERANCE || residual <= RELATIVE_TOLERANCE * scale
}

fn linear(
    index: usize,
    r0: &Point3<f64>,
    r1: &Point3<f64>,
    re: &Point3<f64>,
) -> Result<Vec<f64>, ConstraintError> {
    let span = r1 - r0;
    let d = re - r0;

    // Divide along the axis with the largest separation.
    let axis = span.iamax();
    if span[axis].abs() < RELATIVE_TOLERANCE {
        return Err(ConstraintError::DegenerateGeometry {
            reason: "the two rigid atoms coincide".to_string(),
        });
    }
    let c = d[axis] / span[axis];

    for k in (0..3).filter(|&k| k != axis) {
        let residual = (d[k] - c * span[k]).abs();
        if !within_tolerance(residual, d[k].abs()) {
            return Err(ConstraintError::NotCollinear { index });
        }
    }
    Ok(vec![1.0 - c, c])
}

/// Inverse of the basis with columns `r1 - r0`, `r2 - r0` and the unit plane normal.
fn planar_basis(
    r0: &Point3<f64>,
    r1: &Point3<f64>,
    r2: &Point3<f64>,
) -> Result<DenseMatrix, ConstraintError> {
    let e1 = r1 - r0;
    let e2 = r2 - r0;
    let normal = e1.cross(&e2);
    let area = normal.norm();
    if area <= RELATIVE_TOLERANCE * e1.norm() * e2.norm() {
        return Err(ConstraintError::DegenerateGeometry {
            reason: "the three rigid atoms are collinear".to_string(),
        });
    }
    inverted_basis(&e1, &e2, &(normal / area))
}

fn planar(
    basis: &mut DenseMatrix,
    index: usize,
    r0: &Point3<f64>,
    re: &Point3<f64>,
) -> Result<Vec<f64>, ConstraintError> {
    let d = re - r0;
    let [u, v, w] = in_basis(basis, &d);
    // `w` is the signed distance from the plane, since the normal has unit length.
    if !within_tolerance(w.abs(), d.norm()) {
        return Err(ConstraintError::NotCoplanar {
            index,
            distance: w.abs(),
        });
    }
    Ok(vec![1.0 - u - v, u, v])
}

fn spatial_basis(
    r0: &Point3<f64>,
    r1: &Point3<f64>,
    r2: &Point3<f64>,
    r3: &Point3<f64>,
) -> Result<DenseMatrix, ConstraintError> {
    inverted_basis(&(r1 - r0), &(r2 - r0), &(r3 - r0))
}

fn spatial(basis: &mut DenseMatrix, r0: &Point3<f64>, re: &Point3<f64>) -> Vec<f64> {
    let [a, b, c] = in_basis(basis, &(re - r0));
    vec![1.0 - a - b - c, a, b, c]
}

fn inverted_basis(
    c0: &Vector3<f64>,
    c1: &Vector3<f64>,
    c2: &Vector3<f64>,
) -> Result<DenseMatrix, ConstraintError> {
    let mut basis = DenseMatrix::from_rows(&[
        [c0.x, c0.y, c0.z],
        [c1.x, c1.y, c1.z],
        [c2.x, c2.y, c2.z],
    ]);
    // Rows were filled with the basis vectors; they belong in the columns.
    basis.transpose();
    basis
        .try_invert(BASIS_PIVOT_TOLERANCE)
        .map_err(|e| ConstraintError::DegenerateGeometry {
            reason: e.to_string(),
        })?;
    Ok(basis)
}

fn in_basis(inverse: &mut DenseMatrix, d: &Vector3<f64>) -> [f64; 3] {
    let mut components = [d.x, d.y, d.z];
    inverse.transform(&mut components);
    components
}

use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoxError {
    #[error("Periodic box lengths must be positive and finite, got {0:?}")]
    InvalidLength([f64; 3]),
}

/// Maps a raw displacement onto its periodic-boundary equivalent.
pub trait MinimumImage {
    fn minimum_image(&self, dr: Vector3<f64>) -> Vector3<f64>;
}

/// Boundary conditions of a simulation box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Boundary {
    /// No periodicity; displacements are used as given.
    #[default]
    Open,
    /// Orthorhombic periodic box with the given edge lengths.
    Periodic {
        #[serde(with = "edge_lengths")]
        lengths: Vector3<f64>,
    },
}

impl Boundary {
    /// Creates an orthorhombic periodic boundary.
    ///
    /// # Errors
    ///
    /// Returns [`BoxError::InvalidLength`] if any edge is non-positive or not finite.
    pub fn periodic(lengths: Vector3<f64>) -> Result<Self, BoxError> {
        if lengths.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(BoxError::InvalidLength([lengths.x, lengths.y, lengths.z]));
        }
        Ok(Self::Periodic { lengths })
    }

    /// Wraps a point into the primary cell `[0, L)`; open boundaries leave it untouched.
    pub fn wrap(&self, point: Point3<f64>) -> Point3<f64> {
        match self {
            Boundary::Open => point,
            Boundary::Periodic { lengths } => {
                Point3::from(point.coords.zip_map(lengths, |x, l| x - l * (x / l).floor()))
            }
        }
    }
}

impl MinimumImage for Boundary {
    #[inline]
    fn minimum_image(&self, dr: Vector3<f64>) -> Vector3<f64> {
        match self {
            Boundary::Open => dr,
            Boundary::Periodic { lengths } => dr.zip_map(lengths, |d, l| d - l * (d / l).round()),
        }
    }
}

mod edge_lengths {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector3<f64>, D::Error> {
        let lengths = <[f64; 3]>::deserialize(deserializer)?;
        Ok(Vector3::from(lengths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    fn vec_approx_equal(a: Vector3<f64>, b: Vector3<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    #[test]
    fn open_boundary_returns_displacement_unchanged() {
        let dr = Vector3::new(12.0, -7.5, 3.0);
        assert_eq!(Boundary::Open.minimum_image(dr), dr);
    }

    #[test]
    fn periodic_boundary_folds_displacement_into_half_box() {
        let boundary = Boundary::periodic(Vector3::new(10.0, 10.0, 20.0)).unwrap();
        let dr = boundary.minimum_image(Vector3::new(9.0, -6.0, 11.0));
        assert!(vec_approx_equal(dr, Vector3::new(-1.0, 4.0, -9.0)));
    }

    #[test]
    fn periodic_boundary_rejects_non_positive_lengths() {
        let result = Boundary::periodic(Vector3::new(10.0, 0.0, 5.0));
        assert_eq!(result, Err(BoxError::InvalidLength([10.0, 0.0, 5.0])));
        assert!(Boundary::periodic(Vector3::new(f64::NAN, 1.0, 1.0)).is_err());
    }

    #[test]
    fn wrap_places_point_in_primary_cell() {
        let boundary = Boundary::periodic(Vector3::new(10.0, 10.0, 10.0)).unwrap();
        let wrapped = boundary.wrap(Point3::new(-1.0, 12.0, 5.0));
        assert!(vec_approx_equal(wrapped.coords, Vector3::new(9.0, 2.0, 5.0)));
    }

    #[test]
    fn boundary_deserializes_from_tagged_table() {
        let periodic: Boundary = toml::from_str("kind = \"periodic\"\nlengths = [1.0, 2.0, 3.0]").unwrap();
        assert_eq!(
            periodic,
            Boundary::Periodic {
                lengths: Vector3::new(1.0, 2.0, 3.0)
            }
        );
        let open: Boundary = toml::from_str("kind = \"open\"").unwrap();
        assert_eq!(open, Boundary::Open);
    }
}

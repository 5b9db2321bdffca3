use super::boundary::{Boundary, MinimumImage};
use super::template::FragmentTemplate;
use nalgebra::{Point3, Vector3};

/// Per-atom positions of every molecule in a simulation, plus its boundary.
///
/// Atoms are addressed by a stable global index. Molecules of one species
/// occupy contiguous ranges, so an atom's global index is the molecule's
/// first index plus the atom's local index in the template.
#[derive(Debug, Clone, Default)]
pub struct SimulationBox {
    boundary: Boundary,
    positions: Vec<Point3<f64>>,
}

impl SimulationBox {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            positions: Vec::new(),
        }
    }

    /// Appends one molecule in its reference conformation, shifted by `offset`.
    ///
    /// # Return
    ///
    /// The global index of the molecule's first atom.
    pub fn add_molecule(&mut self, template: &FragmentTemplate, offset: Vector3<f64>) -> usize {
        let first_atom = self.positions.len();
        self.positions
            .extend(template.positions().map(|p| self.boundary.wrap(p + offset)));
        first_atom
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn atom_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn position(&self, index: usize) -> &Point3<f64> {
        &self.positions[index]
    }

    #[inline]
    pub fn position_mut(&mut self, index: usize) -> &mut Point3<f64> {
        &mut self.positions[index]
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    /// Positions together with the boundary, for callers that mutate one while reading the other.
    pub fn split_mut(&mut self) -> (&Boundary, &mut [Point3<f64>]) {
        (&self.boundary, &mut self.positions)
    }
}

impl MinimumImage for SimulationBox {
    #[inline]
    fn minimum_image(&self, dr: Vector3<f64>) -> Vector3<f64> {
        self.boundary.minimum_image(dr)
    }
}

use super::rigid::RigidConstraint;
use crate::core::linalg::DenseMatrix;
use crate::core::models::boundary::MinimumImage;
use crate::core::models::sim_box::SimulationBox;
use nalgebra::{Point3, Vector3};
use std::ops::Range;

impl RigidConstraint {
    fn molecule_range(&self, first_atom: usize) -> Range<usize> {
        first_atom..first_atom + self.atoms_per_molecule()
    }

    /// Places every extra atom of the molecule starting at `first_atom` from
    /// the current positions of its rigid atoms.
    ///
    /// Call this after the rigid atoms have moved and before anything reads
    /// the extra atoms' positions.
    ///
    /// # Panics
    ///
    /// Panics if the molecule does not lie inside the box.
    pub fn relax_molecules(&self, sim_box: &mut SimulationBox, first_atom: usize) {
        let range = self.molecule_range(first_atom);
        let (boundary, positions) = sim_box.split_mut();
        self.relax_positions(&mut positions[range], boundary);
    }

    /// Like [`RigidConstraint::relax_molecules`], for one molecule's own
    /// slice of positions indexed by local atom index.
    ///
    /// Displacements from the first rigid atom go through the minimum image,
    /// so a molecule split across a periodic boundary is placed as a whole.
    pub fn relax_positions<B>(&self, atoms: &mut [Point3<f64>], boundary: &B)
    where
        B: MinimumImage + ?Sized,
    {
        if self.extra_sites().is_empty() {
            return;
        }
        let anchor = atoms[self.rigid_atoms()[0]];
        for site in self.extra_sites() {
            // The weights sum to 1, so the anchor carries the remainder.
            let offset = self
                .rigid_atoms()
                .iter()
                .zip(&site.coefficients)
                .skip(1)
                .fold(Vector3::zeros(), |acc, (&rigid, &c)| {
                    acc + boundary.minimum_image(atoms[rigid] - anchor) * c
                });
            atoms[site.atom] = anchor + offset;
        }
    }

    /// Moves the forces on the extra atoms of the molecule starting at
    /// `first_atom` onto its rigid atoms.
    ///
    /// The extra atoms' net force is split over the rigid atoms by mass, and
    /// their net torque about the centre of mass is turned into the angular
    /// acceleration `α = I⁻¹ τ`, applied as `m α × r` on each rigid atom. The
    /// extra atoms' forces are zeroed. When the extra atoms are massless the
    /// net force and net torque of the molecule are unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the molecule does not lie inside the box and `forces`.
    pub fn redistribute_forces(
        &self,
        sim_box: &SimulationBox,
        first_atom: usize,
        forces: &mut [Vector3<f64>],
    ) {
        let range = self.molecule_range(first_atom);
        self.redistribute_instance(
            &sim_box.positions()[range.clone()],
            sim_box.boundary(),
            &mut forces[range],
        );
    }

    /// Like [`RigidConstraint::redistribute_forces`], for one molecule's own
    /// slices of positions and forces indexed by local atom index.
    pub fn redistribute_instance<B>(
        &self,
        atoms: &[Point3<f64>],
        boundary: &B,
        forces: &mut [Vector3<f64>],
    ) where
        B: MinimumImage + ?Sized,
    {
        if self.extra_sites().is_empty() {
            return;
        }
        let anchor = atoms[self.rigid_atoms()[0]];
        let unwrapped = |i: usize| boundary.minimum_image(atoms[i] - anchor);

        let mut total_mass = 0.0;
        let mut weighted = Vector3::zeros();
        for i in self.constrained_atoms() {
            let mass = self.masses[i];
            total_mass += mass;
            weighted += unwrapped(i) * mass;
        }
        let com = weighted / total_mass;
        let lever = |i: usize| unwrapped(i) - com;

        let mut net_force = Vector3::zeros();
        let mut torque = Vector3::zeros();
        for site in self.extra_sites() {
            let f = forces[site.atom];
            net_force += f;
            torque += lever(site.atom).cross(&f);
            forces[site.atom] = Vector3::zeros();
        }

        let mut inertia = DenseMatrix::new(3, 3);
        for i in self.constrained_atoms() {
            let mass = self.masses[i];
            if mass == 0.0 {
                continue;
            }
            let r = lever(i);
            let r2 = r.norm_squared();
            for k in 0..3 {
                inertia[(k, k)] += mass * r2;
                for l in 0..3 {
                    inertia[(k, l)] -= mass * r[k] * r[l];
                }
            }
        }
        if let [a, b] = self.rigid_atoms() {
            // A linear body has no moment about its own axis. Fill that
            // direction with the perpendicular moment so the tensor inverts;
            // torques from collinear extra atoms have no axial part.
            let axis = (lever(*b) - lever(*a)).normalize();
            let perpendicular = 0.5 * (inertia[(0, 0)] + inertia[(1, 1)] + inertia[(2, 2)]);
            for k in 0..3 {
                for l in 0..3 {
                    inertia[(k, l)] += perpendicular * axis[k] * axis[l];
                }
            }
        }
        inertia.invert();
        let mut alpha = [torque.x, torque.y, torque.z];
        inertia.transform(&mut alpha);
        let alpha = Vector3::from(alpha);

        for &i in self.rigid_atoms() {
            let mass = self.masses[i];
            forces[i] += net_force * (mass / total_mass) + alpha.cross(&lever(i)) * mass;
        }
    }
}

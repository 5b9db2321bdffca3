use super::coefficients;
use super::error::ConstraintError;
use super::topology::Topology;
use crate::core::models::template::ReferenceGeometry;
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::{debug, trace};

/// An atom whose position follows the rigid atoms through a fixed affine combination.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraSite {
    /// Local index of the atom within the species.
    pub atom: usize,
    /// One weight per rigid atom, in rigid-atom order; the weights sum to 1.
    pub coefficients: Vec<f64>,
}

/// The rigid-body constraint of one species.
///
/// Built once from the species' reference geometry and shared by every
/// molecule of that species. Rigid atoms are integrated normally; extra atoms
/// are placed by [`RigidConstraint::relax_molecules`] and have their forces
/// moved onto the rigid atoms by [`RigidConstraint::redistribute_forces`].
#[derive(Debug, Clone, PartialEq)]
pub struct RigidConstraint {
    rigid_atoms: Vec<usize>,
    bond_lengths: Vec<f64>,
    topology: Topology,
    fully_rigid: bool,
    extra_sites: Vec<ExtraSite>,
    /// Masses of every atom in the species, by local index.
    pub(super) masses: Vec<f64>,
}

impl RigidConstraint {
    /// Validates the rigid topology and derives extra-atom coefficients.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Reference conformation and masses of the species.
    /// * `rigid_atoms` - Local indices of the atoms spanning the body's orientation.
    /// * `bond_lengths` - Fixed distances between rigid atoms; their count sets the topology.
    /// * `extra_atoms` - Local indices of atoms fully determined by the rigid atoms.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] describing the first problem found with
    /// the topology, the indices, the masses, or the reference geometry.
    pub fn new<G: ReferenceGeometry + ?Sized>(
        geometry: &G,
        rigid_atoms: &[usize],
        bond_lengths: &[f64],
        extra_atoms: &[usize],
    ) -> Result<Self, ConstraintError> {
        let topology = Topology::classify(rigid_atoms.len(), bond_lengths.len())?;
        let fully_rigid = topology.is_fully_rigid(rigid_atoms.len());
        if !extra_atoms.is_empty() && !fully_rigid {
            return Err(ConstraintError::ExtraAtomsNotFullyRigid);
        }

        let atom_count = geometry.atom_count();
        let mut seen = HashSet::with_capacity(rigid_atoms.len() + extra_atoms.len());
        for &index in rigid_atoms.iter().chain(extra_atoms) {
            if index >= atom_count {
                return Err(ConstraintError::AtomIndexOutOfRange { index, atom_count });
            }
            if !seen.insert(index) {
                return Err(ConstraintError::DuplicateAtom { index });
            }
        }

        if let Some((position, &value)) = bond_lengths
            .iter()
            .enumerate()
            .find(|(_, l)| !l.is_finite() || **l <= 0.0)
        {
            return Err(ConstraintError::InvalidBondLength { position, value });
        }

        let masses: Vec<f64> = (0..atom_count).map(|i| geometry.mass(i)).collect();
        if let Some((index, &mass)) = masses
            .iter()
            .enumerate()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(ConstraintError::InvalidMass { index, mass });
        }

        let mut extra_sites = Vec::with_capacity(extra_atoms.len());
        if !extra_atoms.is_empty() {
            if let Some(&index) = rigid_atoms.iter().find(|&&i| masses[i] == 0.0) {
                return Err(ConstraintError::MasslessRigidAtom { index });
            }

            let skeleton: Vec<Point3<f64>> = rigid_atoms
                .iter()
                .map(|&i| geometry.reference_position(i))
                .collect();
            let extras: Vec<(usize, Point3<f64>)> = extra_atoms
                .iter()
                .map(|&i| (i, geometry.reference_position(i)))
                .collect();

            let derived = coefficients::derive(&skeleton, &extras)?;
            for (&atom, coefficients) in extra_atoms.iter().zip(derived) {
                trace!(atom, ?coefficients, "Derived extra-atom coefficients.");
                extra_sites.push(ExtraSite { atom, coefficients });
            }
        }

        debug!(
            rigid_atoms = rigid_atoms.len(),
            extra_atoms = extra_sites.len(),
            ?topology,
            fully_rigid,
            "Built rigid constraint."
        );

        Ok(Self {
            rigid_atoms: rigid_atoms.to_vec(),
            bond_lengths: bond_lengths.to_vec(),
            topology,
            fully_rigid,
            extra_sites,
            masses,
        })
    }

    pub fn rigid_atoms(&self) -> &[usize] {
        &self.rigid_atoms
    }

    pub fn bond_lengths(&self) -> &[f64] {
        &self.bond_lengths
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn is_fully_rigid(&self) -> bool {
        self.fully_rigid
    }

    pub fn extra_sites(&self) -> &[ExtraSite] {
        &self.extra_sites
    }

    pub fn extra_atoms(&self) -> impl Iterator<Item = usize> + '_ {
        self.extra_sites.iter().map(|s| s.atom)
    }

    /// Number of atoms in one molecule of the species.
    pub fn atoms_per_molecule(&self) -> usize {
        self.masses.len()
    }

    /// Rigid atoms followed by extra atoms.
    pub(super) fn constrained_atoms(&self) -> impl Iterator<Item = usize> + '_ {
        self.rigid_atoms.iter().copied().chain(self.extra_atoms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::template::{FragmentTemplate, TemplateAtom};

    const TOLERANCE: f64 = 1e-9;

    fn template(atoms: &[(f64, [f64; 3])]) -> FragmentTemplate {
        FragmentTemplate::new(
            "test",
            atoms
                .iter()
                .map(|(mass, xyz)| TemplateAtom::new("X", *mass, Point3::from(*xyz)))
                .collect(),
        )
    }

    fn triangle() -> FragmentTemplate {
        template(&[
            (1.0, [0.0, 0.0, 0.0]),
            (1.0, [1.0, 0.0, 0.0]),
            (1.0, [0.0, 1.0, 0.0]),
            (0.0, [0.25, 0.25, 0.0]),
        ])
    }

    fn tetrahedron() -> FragmentTemplate {
        template(&[
            (2.0, [0.0, 0.0, 0.0]),
            (1.0, [1.0, 0.0, 0.0]),
            (1.0, [0.0, 1.0, 0.0]),
            (1.0, [0.0, 0.0, 1.0]),
            (0.0, [0.4, -0.2, 0.7]),
        ])
    }

    #[test]
    fn three_rigid_atoms_with_one_bond_length_are_rejected() {
        let result = RigidConstraint::new(&triangle(), &[0, 1, 2], &[1.0], &[]);
        assert!(matches!(
            result,
            Err(ConstraintError::BondLengthCount {
                rigid_atoms: 3,
                bond_lengths: 1,
                ..
            })
        ));
    }

    #[test]
    fn three_rigid_atoms_are_fully_rigid_only_as_a_ring() {
        let chain = RigidConstraint::new(&triangle(), &[0, 1, 2], &[1.0, 1.0], &[]).unwrap();
        assert!(!chain.is_fully_rigid());
        assert_eq!(chain.topology(), Topology::Chain);

        let ring =
            RigidConstraint::new(&triangle(), &[0, 1, 2], &[1.0, 1.0, 1.414], &[]).unwrap();
        assert!(ring.is_fully_rigid());
        assert_eq!(ring.topology(), Topology::Ring);
    }

    #[test]
    fn four_rigid_atoms_need_six_bond_lengths_to_be_fully_rigid() {
        let five = RigidConstraint::new(&tetrahedron(), &[0, 1, 2, 3], &[1.0; 5], &[]);
        assert!(matches!(
            five,
            Err(ConstraintError::BondLengthCount { .. })
        ));
        let six = RigidConstraint::new(&tetrahedron(), &[0, 1, 2, 3], &[1.0; 6], &[]).unwrap();
        assert!(six.is_fully_rigid());
        assert_eq!(six.topology(), Topology::Tetrahedron);
    }

    #[test]
    fn single_rigid_atom_is_rejected() {
        assert_eq!(
            RigidConstraint::new(&triangle(), &[0], &[], &[]),
            Err(ConstraintError::TooFewRigidAtoms(1))
        );
    }

    #[test]
    fn extra_atoms_require_full_rigidity() {
        let result = RigidConstraint::new(&triangle(), &[0, 1, 2], &[1.0, 1.0], &[3]);
        assert_eq!(result, Err(ConstraintError::ExtraAtomsNotFullyRigid));
    }

    #[test]
    fn out_of_range_and_duplicate_indices_are_rejected() {
        let out_of_range = RigidConstraint::new(&triangle(), &[0, 9], &[1.0], &[]);
        assert_eq!(
            out_of_range,
            Err(ConstraintError::AtomIndexOutOfRange {
                index: 9,
                atom_count: 4
            })
        );
        let duplicate = RigidConstraint::new(&triangle(), &[0, 1, 2], &[1.0; 3], &[1]);
        assert_eq!(duplicate, Err(ConstraintError::DuplicateAtom { index: 1 }));
    }

    #[test]
    fn non_positive_bond_lengths_are_rejected() {
        let result = RigidConstraint::new(&triangle(), &[0, 1], &[-1.0], &[]);
        assert_eq!(
            result,
            Err(ConstraintError::InvalidBondLength {
                position: 0,
                value: -1.0
            })
        );
    }

    #[test]
    fn invalid_masses_are_rejected() {
        let negative = template(&[(1.0, [0.0; 3]), (-1.0, [1.0, 0.0, 0.0])]);
        assert_eq!(
            RigidConstraint::new(&negative, &[0, 1], &[1.0], &[]),
            Err(ConstraintError::InvalidMass {
                index: 1,
                mass: -1.0
            })
        );

        let massless = template(&[
            (0.0, [0.0; 3]),
            (1.0, [2.0, 0.0, 0.0]),
            (0.0, [1.0, 0.0, 0.0]),
        ]);
        assert_eq!(
            RigidConstraint::new(&massless, &[0, 1], &[2.0], &[2]),
            Err(ConstraintError::MasslessRigidAtom { index: 0 })
        );
    }

    #[test]
    fn derived_coefficients_reproduce_reference_positions() {
        for (geometry, rigid, bonds) in [
            (triangle(), vec![0, 1, 2], vec![1.0, 1.0, 1.414]),
            (tetrahedron(), vec![0, 1, 2, 3], vec![1.0; 6]),
        ] {
            let extra = rigid.len();
            let constraint = RigidConstraint::new(&geometry, &rigid, &bonds, &[extra]).unwrap();
            let site = &constraint.extra_sites()[0];
            assert_eq!(site.atom, extra);
            assert_eq!(site.coefficients.len(), rigid.len());
            assert!((site.coefficients.iter().sum::<f64>() - 1.0).abs() < TOLERANCE);

            let mut rebuilt = nalgebra::Vector3::zeros();
            for (&r, c) in rigid.iter().zip(&site.coefficients) {
                rebuilt += geometry.reference_position(r).coords * *c;
            }
            assert!((rebuilt - geometry.reference_position(extra).coords).norm() < TOLERANCE);
        }
    }

    #[test]
    fn accessors_report_configuration() {
        let constraint =
            RigidConstraint::new(&triangle(), &[0, 1, 2], &[1.0, 1.0, 1.414], &[3]).unwrap();
        assert_eq!(constraint.rigid_atoms(), &[0, 1, 2]);
        assert_eq!(constraint.bond_lengths(), &[1.0, 1.0, 1.414]);
        assert_eq!(constraint.extra_atoms().collect::<Vec<_>>(), vec![3]);
        assert_eq!(constraint.atoms_per_molecule(), 4);
        assert_eq!(
            constraint.constrained_atoms().collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn constraint_can_be_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RigidConstraint>();
    }
}

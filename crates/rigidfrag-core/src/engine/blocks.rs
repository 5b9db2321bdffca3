use super::error::EngineError;
use crate::core::constraint::RigidConstraint;
use crate::core::models::sim_box::SimulationBox;
use nalgebra::Vector3;
use std::ops::Range;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A run of consecutive molecules of one species sharing a constraint.
///
/// Molecule `k` of the block starts at `first_atom + k * atoms_per_molecule`.
#[derive(Debug, Clone, Copy)]
pub struct MoleculeBlock<'c> {
    constraint: &'c RigidConstraint,
    first_atom: usize,
    molecule_count: usize,
}

impl<'c> MoleculeBlock<'c> {
    pub fn new(constraint: &'c RigidConstraint, first_atom: usize, molecule_count: usize) -> Self {
        Self {
            constraint,
            first_atom,
            molecule_count,
        }
    }

    pub fn constraint(&self) -> &'c RigidConstraint {
        self.constraint
    }

    pub fn molecule_count(&self) -> usize {
        self.molecule_count
    }

    /// Global atom indices covered by the block.
    ///
    /// The end saturates at `usize::MAX` if the block is too large to address.
    pub fn atom_range(&self) -> Range<usize> {
        self.first_atom..self.end_atom().unwrap_or(usize::MAX)
    }

    fn end_atom(&self) -> Option<usize> {
        self.molecule_count
            .checked_mul(self.constraint.atoms_per_molecule())?
            .checked_add(self.first_atom)
    }

    fn check_fits(&self, available: usize) -> Result<Range<usize>, EngineError> {
        match self.end_atom() {
            Some(end) if end <= available => Ok(self.first_atom..end),
            end => Err(EngineError::BlockOutOfRange {
                start: self.first_atom,
                end: end.unwrap_or(usize::MAX),
                available,
            }),
        }
    }

    /// Re-places the extra atoms of every molecule in the block.
    #[instrument(level = "debug", skip_all, fields(first_atom = self.first_atom, molecules = self.molecule_count))]
    pub fn relax_all(&self, sim_box: &mut SimulationBox) -> Result<(), EngineError> {
        let range = self.check_fits(sim_box.atom_count())?;
        let n = self.constraint.atoms_per_molecule();
        let constraint = self.constraint;
        let (boundary, positions) = sim_box.split_mut();
        let block = &mut positions[range];

        #[cfg(feature = "parallel")]
        block
            .par_chunks_mut(n)
            .for_each(|atoms| constraint.relax_positions(atoms, boundary));

        #[cfg(not(feature = "parallel"))]
        block
            .chunks_mut(n)
            .for_each(|atoms| constraint.relax_positions(atoms, boundary));

        Ok(())
    }

    /// Moves extra-atom forces onto the rigid atoms for every molecule in the block.
    ///
    /// `forces` is indexed like the box positions.
    #[instrument(level = "debug", skip_all, fields(first_atom = self.first_atom, molecules = self.molecule_count))]
    pub fn redistribute_all(
        &self,
        sim_box: &SimulationBox,
        forces: &mut [Vector3<f64>],
    ) -> Result<(), EngineError> {
        let range = self.check_fits(sim_box.atom_count().min(forces.len()))?;
        let n = self.constraint.atoms_per_molecule();
        let constraint = self.constraint;
        let boundary = sim_box.boundary();
        let positions = &sim_box.positions()[range.clone()];
        let forces = &mut forces[range];

        #[cfg(feature = "parallel")]
        forces
            .par_chunks_mut(n)
            .zip(positions.par_chunks(n))
            .for_each(|(f, atoms)| constraint.redistribute_instance(atoms, boundary, f));

        #[cfg(not(feature = "parallel"))]
        forces
            .chunks_mut(n)
            .zip(positions.chunks(n))
            .for_each(|(f, atoms)| constraint.redistribute_instance(atoms, boundary, f));

        Ok(())
    }
}

use super::error::ConstraintError;

/// Connectivity implied by the number of bond lengths given for the rigid atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// `n - 1` bond lengths; a dimer is the two-atom chain.
    Chain,
    /// `n` bond lengths closing the chain.
    Ring,
    /// Four atoms with all six pair distances fixed.
    Tetrahedron,
}

impl Topology {
    /// Derives the topology from the rigid-atom and bond-length counts.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::TooFewRigidAtoms`] for fewer than two rigid
    /// atoms and [`ConstraintError::BondLengthCount`] when the count of bond
    /// lengths matches no supported topology.
    pub fn classify(rigid_atoms: usize, bond_lengths: usize) -> Result<Self, ConstraintError> {
        let mismatch = |expected: String| ConstraintError::BondLengthCount {
            rigid_atoms,
            bond_lengths,
            expected,
        };
        match (rigid_atoms, bond_lengths) {
            (0 | 1, _) => Err(ConstraintError::TooFewRigidAtoms(rigid_atoms)),
            (2, 1) => Ok(Topology::Chain),
            (2, _) => Err(mismatch("1".into())),
            (3, 2) => Ok(Topology::Chain),
            (3, 3) => Ok(Topology::Ring),
            (3, _) => Err(mismatch("2 (chain) or 3 (ring)".into())),
            (4, 3) => Ok(Topology::Chain),
            (4, 4) => Ok(Topology::Ring),
            (4, 6) => Ok(Topology::Tetrahedron),
            (4, _) => Err(mismatch("3 (chain), 4 (ring) or 6 (tetrahedron)".into())),
            (n, b) if b == n - 1 => Ok(Topology::Chain),
            (n, b) if b == n => Ok(Topology::Ring),
            (n, _) => Err(mismatch(format!("{} (chain) or {} (ring)", n - 1, n))),
        }
    }

    /// True when the bond lengths leave no internal degree of freedom among
    /// `rigid_atoms` atoms: a dimer, a triangle, or a tetrahedron.
    pub fn is_fully_rigid(self, rigid_atoms: usize) -> bool {
        matches!(
            (rigid_atoms, self),
            (2, Topology::Chain) | (3, Topology::Ring) | (4, Topology::Tetrahedron)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_rigid_atoms_are_rejected() {
        assert_eq!(
            Topology::classify(1, 0),
            Err(ConstraintError::TooFewRigidAtoms(1))
        );
        assert_eq!(
            Topology::classify(0, 0),
            Err(ConstraintError::TooFewRigidAtoms(0))
        );
    }

    #[test]
    fn dimer_needs_exactly_one_bond_length() {
        assert_eq!(Topology::classify(2, 1), Ok(Topology::Chain));
        assert!(Topology::Chain.is_fully_rigid(2));
        assert!(matches!(
            Topology::classify(2, 2),
            Err(ConstraintError::BondLengthCount { .. })
        ));
    }

    #[test]
    fn triangle_accepts_chain_or_ring() {
        assert!(Topology::classify(3, 1).is_err());
        assert_eq!(Topology::classify(3, 2), Ok(Topology::Chain));
        assert_eq!(Topology::classify(3, 3), Ok(Topology::Ring));
        assert!(Topology::classify(3, 4).is_err());
        assert!(!Topology::Chain.is_fully_rigid(3));
        assert!(Topology::Ring.is_fully_rigid(3));
    }

    #[test]
    fn four_atoms_accept_chain_ring_or_tetrahedron() {
        assert_eq!(Topology::classify(4, 3), Ok(Topology::Chain));
        assert_eq!(Topology::classify(4, 4), Ok(Topology::Ring));
        assert!(Topology::classify(4, 5).is_err());
        assert_eq!(Topology::classify(4, 6), Ok(Topology::Tetrahedron));
        assert!(Topology::classify(4, 7).is_err());
        assert!(!Topology::Ring.is_fully_rigid(4));
        assert!(Topology::Tetrahedron.is_fully_rigid(4));
    }

    #[test]
    fn larger_bodies_are_chains_or_rings_and_never_fully_rigid() {
        assert_eq!(Topology::classify(6, 5), Ok(Topology::Chain));
        assert_eq!(Topology::classify(6, 6), Ok(Topology::Ring));
        assert!(!Topology::Ring.is_fully_rigid(6));
        let err = Topology::classify(6, 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "6 rigid atoms need 5 (chain) or 6 (ring) bond lengths, got 7"
        );
    }
}

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("At least 2 rigid atoms are required, got {0}")]
    TooFewRigidAtoms(usize),

    #[error("{rigid_atoms} rigid atoms need {expected} bond lengths, got {bond_lengths}")]
    BondLengthCount {
        rigid_atoms: usize,
        bond_lengths: usize,
        expected: String,
    },

    #[error("Extra atoms are only possible if the rigid atoms are fully rigid")]
    ExtraAtomsNotFullyRigid,

    #[error("Atom index {index} is outside the template ({atom_count} atoms)")]
    AtomIndexOutOfRange { index: usize, atom_count: usize },

    #[error("Atom {index} is listed more than once among the rigid and extra atoms")]
    DuplicateAtom { index: usize },

    #[error("Bond length #{position} is {value}; bond lengths must be positive and finite")]
    InvalidBondLength { position: usize, value: f64 },

    #[error("Atom {index} has mass {mass}; masses must be finite and non-negative")]
    InvalidMass { index: usize, mass: f64 },

    #[error("Rigid atom {index} is massless, but forces of extra atoms must be carried by rigid atoms")]
    MasslessRigidAtom { index: usize },

    #[error("Reference geometry of the rigid atoms is degenerate: {reason}")]
    DegenerateGeometry { reason: String },

    #[error("Extra atom {index} does not line up with the rigid pair")]
    NotCollinear { index: usize },

    #[error("Extra atom {index} lies {distance:e} out of the plane of the rigid atoms")]
    NotCoplanar { index: usize, distance: f64 },
}

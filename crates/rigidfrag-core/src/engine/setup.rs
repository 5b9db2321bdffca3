use super::error::EngineError;
use crate::core::constraint::RigidConstraint;
use crate::core::io::fragments::FragmentRegistry;
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Builds the constraint of every fragment in `registry`, keyed by fragment name.
///
/// # Errors
///
/// Returns [`EngineError::Fragment`] naming the first fragment (in name order)
/// whose definition is rejected.
#[instrument(skip_all, name = "constraint_setup")]
pub fn build_constraints(
    registry: &FragmentRegistry,
) -> Result<BTreeMap<String, RigidConstraint>, EngineError> {
    let mut names: Vec<&String> = registry.keys().collect();
    names.sort();

    let mut constraints = BTreeMap::new();
    for name in names {
        let constraint = registry[name]
            .build()
            .map_err(|source| EngineError::Fragment {
                fragment: name.clone(),
                source,
            })?;
        info!(
            fragment = %name,
            rigid_atoms = constraint.rigid_atoms().len(),
            extra_atoms = constraint.extra_sites().len(),
            fully_rigid = constraint.is_fully_rigid(),
            "Rigid fragment ready."
        );
        constraints.insert(name.clone(), constraint);
    }
    Ok(constraints)
}

use crate::core::constraint::{ConstraintError, RigidConstraint};
use crate::core::models::template::{FragmentTemplate, TemplateAtom};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// A rigid fragment as written in a fragment file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FragmentDefinition {
    pub atoms: Vec<TemplateAtom>,
    pub rigid_atoms: Vec<usize>,
    pub bond_lengths: Vec<f64>,
    #[serde(default)]
    pub extra_atoms: Vec<usize>,
}

pub type FragmentRegistry = HashMap<String, FragmentDefinition>;

#[derive(Debug, Error)]
pub enum FragmentLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl FragmentDefinition {
    pub fn template(&self, name: &str) -> FragmentTemplate {
        FragmentTemplate::new(name, self.atoms.clone())
    }

    pub fn build(&self) -> Result<RigidConstraint, ConstraintError> {
        RigidConstraint::new(
            &self.template(""),
            &self.rigid_atoms,
            &self.bond_lengths,
            &self.extra_atoms,
        )
    }
}

pub fn load_fragment_registry(path: &Path) -> Result<FragmentRegistry, FragmentLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| FragmentLoadError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| FragmentLoadError::Toml {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

use nalgebra::Point3;
use serde::Deserialize;

/// Read access to a species' reference conformation.
///
/// Indices are local to one molecule of the species, `0..atom_count()`.
pub trait ReferenceGeometry {
    fn atom_count(&self) -> usize;
    fn reference_position(&self, index: usize) -> Point3<f64>;
    fn mass(&self, index: usize) -> f64;
}

/// One atom of a fragment template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateAtom {
    /// Display name, e.g. "O" or "M".
    #[serde(default)]
    pub name: String,
    /// Atomic mass; zero marks a massless virtual site.
    pub mass: f64,
    /// Reference position in the template's own frame.
    #[serde(deserialize_with = "point_from_array")]
    pub position: Point3<f64>,
}

impl TemplateAtom {
    pub fn new(name: &str, mass: f64, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            mass,
            position,
        }
    }
}

/// The reference geometry and masses of one molecular species.
///
/// A template is immutable once built and is shared by every molecule of the
/// species; the box stores per-molecule copies of the positions.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentTemplate {
    #[serde(default)]
    pub name: String,
    pub atoms: Vec<TemplateAtom>,
}

impl FragmentTemplate {
    pub fn new(name: &str, atoms: Vec<TemplateAtom>) -> Self {
        Self {
            name: name.to_string(),
            atoms,
        }
    }

    pub fn total_mass(&self) -> f64 {
        self.atoms.iter().map(|a| a.mass).sum()
    }

    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.atoms.iter().map(|a| a.position)
    }
}

impl ReferenceGeometry for FragmentTemplate {
    fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    fn reference_position(&self, index: usize) -> Point3<f64> {
        self.atoms[index].position
    }

    fn mass(&self, index: usize) -> f64 {
        self.atoms[index].mass
    }
}

fn point_from_array<'de, D>(deserializer: D) -> Result<Point3<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let xyz = <[f64; 3]>::deserialize(deserializer)?;
    Ok(Point3::from(xyz))
}

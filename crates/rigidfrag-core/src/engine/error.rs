use crate::core::constraint::ConstraintError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("Molecule block spanning atoms {start}..{end} does not fit in {available} atoms")]
    BlockOutOfRange {
        start: usize,
        end: usize,
        available: usize,
    },

    #[error("Failed to set up rigid fragment '{fragment}': {source}")]
    Fragment {
        fragment: String,
        #[source]
        source: ConstraintError,
    },
}

use thiserror::Error;

use crate::core::models::ids::GlobalId;

/// Errors that abort an all-atom generation run.
///
/// A failed run leaves the structure without a cached model; the previous
/// model is discarded rather than served as if it matched the edited state.
#[derive(Debug, Error, PartialEq)]
pub enum GenerationError {
    #[error("projected atom count {projected} exceeds the generation ceiling of {ceiling}")]
    AtomBudgetExceeded { projected: usize, ceiling: usize },
    #[error("no fragment for monomer type '{code}' in the library")]
    FragmentNotFound { code: String },
    #[error("fragment '{fragment}' is missing required atom '{atom}'")]
    MissingRequiredAtom { fragment: String, atom: String },
    #[error("monomer {id} has no assigned type")]
    UnsetMonomerType { id: GlobalId },
}

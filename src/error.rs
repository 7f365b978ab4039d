use thiserror::Error;

/// Structural problems detected in a caller-supplied dataset.
///
/// Only [`Dataset::validate`](crate::Dataset::validate) and the `try_*` constructors
/// report these. Navigation and filtering on an unvalidated dataset skip dangling
/// references instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// A `children` list names an id that is not a key of the dataset.
    #[error("node `{parent}` lists unknown child `{child}`")]
    DanglingChild { parent: String, child: String },

    /// The same id was supplied more than once while building a dataset.
    #[error("duplicate node id `{id}`")]
    DuplicateId { id: String },

    /// An id appears in the `children` list of two different nodes.
    #[error("node `{id}` is listed by both `{first}` and `{second}`")]
    MultipleParents {
        id: String,
        first: String,
        second: String,
    },

    /// The node is not reachable from any top-level entry, so it lies on or below a cycle.
    #[error("node `{id}` lies on or below a cycle")]
    Cycle { id: String },
}

/// Result alias for dataset construction and validation.
pub type Result<T> = std::result::Result<T, DatasetError>;

use thiserror::Error;

pub type WeaveResult<T> = Result<T, WeaveError>;

#[derive(Error, Debug, Clone)]
pub enum WeaveError {
    #[error("Unknown node tag '{tag}'")]
    UnknownTag { tag: String },

    #[error("Invalid property '{property}' for node '{node}': {reason}")]
    InvalidProperty {
        node: String,
        property: String,
        reason: String,
    },

    #[error("Maximum nesting depth ({max_depth}) exceeded")]
    MaxNestingDepthExceeded { max_depth: usize },

    #[error("Duplicate id '{id}': node ids must be unique within the tree")]
    DuplicateId { id: String },

    #[error("Empty tree: the component returned no renderable node")]
    EmptyTree,
}

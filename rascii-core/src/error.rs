//! Error types for the rendering core.

use thiserror::Error;

use crate::scene::NodeId;

/// Main error type for rendering operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Render settings that cannot produce a valid projection
    #[error("Invalid render settings: {0}")]
    Configuration(String),

    /// Vector or matrix component access outside its bounds
    #[error("Index {index} out of range (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Matrix has no inverse
    #[error("Matrix is singular")]
    SingularMatrix,

    /// Normalizing a vector whose length is zero
    #[error("Cannot normalize a zero-length vector")]
    ZeroLength,

    /// Zero-area triangle, zero-length normal or unusable projection
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// `render` called before `prepare` (or after `cleanup`)
    #[error("Render pipeline is not prepared")]
    NotPrepared,

    /// Node id does not belong to this scene graph
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Node already has a parent
    #[error("Node {0} already has a parent")]
    AlreadyParented(NodeId),

    /// Attaching the node would make it its own ancestor
    #[error("Attaching {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a degenerate geometry error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }
}

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

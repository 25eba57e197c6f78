//! Scene graph errors

use super::NodeId;

/// Errors raised by scene graph operations
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// The id does not name a node in this graph
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// A node record could not be written
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A node record could not be read
    #[error("Parse error: {0}")]
    Parse(String),
}

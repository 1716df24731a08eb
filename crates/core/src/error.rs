//! Error types shared across the cullfx crates.

use thiserror::Error;

/// Main error type for scene and device operations.
///
/// The render-effect contract itself never fails; these errors come from
/// the surrounding graph storage and configuration layers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node handle did not refer to a node in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    /// The node carries an effect that forbids externally applied transforms
    #[error("Node '{node}' has effects that are not safe to transform: {effects}")]
    UnsafeTransform {
        /// Name of the node that refused the transform.
        node: String,
        /// Display form of the node's effects.
        effects: String,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias using the cullfx Error type.
pub type Result<T> = std::result::Result<T, Error>;

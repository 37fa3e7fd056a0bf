//! Render errors.

use crate::config::ConfigError;
use glossa_syntax::ReadError;

/// Error that aborts a render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The target has no rendering for this node.
    #[error("{target}: unsupported {kind}: {fields}")]
    Unsupported {
        target: &'static str,
        kind: &'static str,
        /// Debug dump of the node.
        fields: String,
    },
}

/// Error from rendering a snippet into every target.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

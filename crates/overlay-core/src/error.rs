//! Error types for theme resolution.

use thiserror::Error;

/// Boxed error produced by a renderer factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for theme operations.
pub type Result<T> = std::result::Result<T, ThemeError>;

/// Errors that can occur while resolving renderers.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The component's runtime type has no renderer binding.
    #[error("no renderer bound for component type `{component}`")]
    UnboundComponentType { component: &'static str },

    /// The bound renderer could not be constructed.
    #[error("failed to construct renderer `{renderer}` for component type `{component}`: {source}")]
    RendererConstructionFailure {
        component: &'static str,
        renderer: &'static str,
        #[source]
        source: BoxError,
    },

    /// The background prepare thread could not be spawned.
    #[error("failed to spawn prepare thread: {0}")]
    PrepareSpawn(#[from] std::io::Error),

    /// The background prepare thread panicked before finishing.
    #[error("prepare thread panicked: {0}")]
    PrepareAborted(String),
}

impl ThemeError {
    /// Name of the component type the error refers to, if any.
    pub fn component_type(&self) -> Option<&'static str> {
        match self {
            Self::UnboundComponentType { component }
            | Self::RendererConstructionFailure { component, .. } => Some(*component),
            Self::PrepareSpawn(_) | Self::PrepareAborted(_) => None,
        }
    }
}

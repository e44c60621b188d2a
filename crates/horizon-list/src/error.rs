//! Error types for list panels.

/// Result type alias for list operations.
pub type Result<T> = std::result::Result<T, ListError>;

/// Errors reported by collections, entities, item views and panel settings.
///
/// Collaborator errors are relayed through `error` signals rather than
/// returned; only configuration and action lookups surface them as `Err`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ListError {
    /// The backing collection reported a failure.
    #[error("collection error: {message}")]
    Collection { message: String },

    /// A bound entity reported a failure.
    #[error("entity error: {message}")]
    Entity { message: String },

    /// An item view reported a failure.
    #[error("item view error: {message}")]
    View { message: String },

    /// Panel settings could not be parsed.
    #[error("invalid panel settings: {0}")]
    Config(#[from] toml::de::Error),

    /// No bulk action is registered under the given label.
    #[error("no bulk action labelled '{label}'")]
    UnknownAction { label: String },
}

impl ListError {
    /// Create a collection error.
    pub fn collection(message: impl Into<String>) -> Self {
        Self::Collection {
            message: message.into(),
        }
    }

    /// Create an entity error.
    pub fn entity(message: impl Into<String>) -> Self {
        Self::Entity {
            message: message.into(),
        }
    }

    /// Create an item view error.
    pub fn view(message: impl Into<String>) -> Self {
        Self::View {
            message: message.into(),
        }
    }
}

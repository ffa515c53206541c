use crate::models::ItemId;
use std::{io, path::PathBuf};

/// Shared error type for slug resolution and restoration.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// The content store could not commit an item.
    #[error("failed to persist item {item}: {reason}")]
    Persistence { item: ItemId, reason: String },

    /// A metadata entry could not be written or removed.
    #[error("metadata `{key}` on item {item}: {reason}")]
    Metadata {
        item: ItemId,
        key: String,
        reason: String,
    },

    /// Slug rules are unusable.
    #[error("invalid slug rules: {0}")]
    InvalidConfig(String),

    /// The pagination pattern derived from the rules did not compile.
    #[error("invalid pagination pattern")]
    Pattern(#[from] regex::Error),

    /// Slug rules file is not valid TOML.
    #[error("could not parse slug rules")]
    ConfigParse(#[from] toml::de::Error),

    /// File system I/O failure.
    #[error("I/O error while accessing {0}")]
    Io(PathBuf, #[source] io::Error),
}

impl CoreError {
    pub fn persistence(item: ItemId, reason: impl Into<String>) -> Self {
        Self::Persistence {
            item,
            reason: reason.into(),
        }
    }

    pub fn metadata(item: ItemId, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            item,
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

//! Error types for drop-target operations.
//!
//! None of these escape the public drag/drop entry points: walk failures drop a single
//! entry, preview failures drop a single preview, drop-effect failures are ignored.
//! They exist so collaborators (entry sources, preview factories, hosts) can report
//! what went wrong and so the recovery sites can log it.

use std::fmt;

use crate::surface::TargetId;

/// A single directory or file entry failed to resolve during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntryError {
    /// Entry vanished between enumeration and resolution
    NotFound(String),
    /// Host denied access to the entry
    PermissionDenied(String),
    /// Entry was expected to be a file but isn't (for example a symlink to a directory)
    NotAFile(String),
    /// Generic I/O error
    Io(String),
}

impl fmt::Display for WalkEntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Entry not found: {}", path),
            Self::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            Self::NotAFile(path) => write!(f, "Not a file: {}", path),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for WalkEntryError {}

impl From<std::io::Error> for WalkEntryError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// A preview reference couldn't be created for an accepted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    /// The item carries no readable content source
    NoSource(String),
    /// Reading the item's bytes failed
    Io(String),
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource(name) => write!(f, "No content source for {}", name),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PreviewError {}

impl From<std::io::Error> for PreviewError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// The host refused to update the drop indicator on a drag event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropEffectError {
    /// Host doesn't support setting the drop effect
    Unsupported,
    /// Host rejected the value
    Rejected(String),
}

impl fmt::Display for DropEffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "Setting the drop effect is not supported"),
            Self::Rejected(msg) => write!(f, "Drop effect rejected: {}", msg),
        }
    }
}

impl std::error::Error for DropEffectError {}

/// Invalid drop-target configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_size` is larger than `max_size`
    InvalidSizeRange { min: u64, max: u64 },
    /// `max_items` of zero would reject every drop
    ZeroMaxItems,
    /// `walk_concurrency` must be at least 1
    ZeroConcurrency,
    /// An accept token couldn't be parsed
    InvalidAcceptPattern(String),
    /// The configuration source couldn't be parsed
    Parse(String),
    /// The configuration file couldn't be read
    Io(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSizeRange { min, max } => {
                write!(f, "Minimum size {} is larger than maximum size {}", min, max)
            }
            Self::ZeroMaxItems => write!(f, "Maximum item count must be at least 1"),
            Self::ZeroConcurrency => write!(f, "Walk concurrency must be at least 1"),
            Self::InvalidAcceptPattern(token) => write!(f, "Invalid accept pattern: {:?}", token),
            Self::Parse(msg) => write!(f, "Config parse error: {}", msg),
            Self::Io(msg) => write!(f, "Config I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// A surface operation named a target that isn't mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    UnknownTarget(TargetId),
    /// Torn-down targets can't be mounted again
    TornDown,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTarget(id) => write!(f, "Drop target {} is not mounted", id),
            Self::TornDown => write!(f, "Drop target was torn down"),
        }
    }
}

impl std::error::Error for SurfaceError {}

//! Acceptance criteria: accept patterns, size bounds, and cardinality.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// One token of an accept list, e.g. `image/png`, `image/*`, or `.pdf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptPattern {
    /// `*` or `*/*`
    Any,
    /// Exact MIME type, lowercased
    Exact(String),
    /// Wildcard subtype; holds the top-level type (`image` for `image/*`)
    Wildcard(String),
    /// File extension including the leading dot, lowercased
    Extension(String),
}

impl AcceptPattern {
    pub fn parse(token: &str) -> Result<Self, ConfigError> {
        let token = token.trim().to_ascii_lowercase();
        let invalid = || ConfigError::InvalidAcceptPattern(token.clone());

        if token == "*" || token == "*/*" {
            return Ok(Self::Any);
        }
        if let Some(ext) = token.strip_prefix('.') {
            if ext.is_empty() || ext.contains('/') {
                return Err(invalid());
            }
            return Ok(Self::Extension(token.clone()));
        }
        let (top, sub) = token.split_once('/').ok_or_else(invalid)?;
        if top.is_empty() || sub.is_empty() || top == "*" || sub.contains('/') {
            return Err(invalid());
        }
        if sub == "*" {
            Ok(Self::Wildcard(top.to_string()))
        } else {
            Ok(Self::Exact(token.clone()))
        }
    }

    /// Matches a MIME type. Extension patterns never match here.
    pub fn matches_mime(&self, mime_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => mime_type.eq_ignore_ascii_case(expected),
            Self::Wildcard(top) => mime_type
                .split_once('/')
                .is_some_and(|(actual_top, _)| actual_top.eq_ignore_ascii_case(top)),
            Self::Extension(_) => false,
        }
    }

    /// Matches a file name by case-insensitive suffix. Only extension patterns match here.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Self::Extension(ext) => name.to_ascii_lowercase().ends_with(ext.as_str()),
            _ => false,
        }
    }
}

impl fmt::Display for AcceptPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "*/*"),
            Self::Exact(mime) => write!(f, "{}", mime),
            Self::Wildcard(top) => write!(f, "{}/*", top),
            Self::Extension(ext) => write!(f, "{}", ext),
        }
    }
}

/// Parses a comma separated accept list such as `"image/*,.pdf"`.
///
/// Empty tokens are skipped, so `""` parses to an empty (accept-all) list.
pub fn parse_accept_list(accept: &str) -> Result<Vec<AcceptPattern>, ConfigError> {
    accept
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(AcceptPattern::parse)
        .collect()
}

/// What happens to a drop that carries more items than the target allows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum OverflowPolicy {
    /// Reject every item of the drop
    #[default]
    RejectAll,
    /// Filter the items within the limit normally, reject the rest unconditionally
    RejectExcess,
}

/// The combined type/size/cardinality rules a drop target enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaSpec {
    /// Empty means accept everything
    pub accept: Vec<AcceptPattern>,
    pub min_size: u64,
    /// `u64::MAX` stands in for unbounded
    pub max_size: u64,
    /// `None` means unbounded
    pub max_items: Option<u32>,
    pub overflow: OverflowPolicy,
}

impl Default for CriteriaSpec {
    fn default() -> Self {
        Self {
            accept: Vec::new(),
            min_size: 0,
            max_size: u64::MAX,
            max_items: None,
            overflow: OverflowPolicy::RejectAll,
        }
    }
}

impl CriteriaSpec {
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn with_accept(mut self, accept: &str) -> Result<Self, ConfigError> {
        self.accept = parse_accept_list(accept)?;
        Ok(self)
    }

    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_max_items(mut self, max_items: Option<u32>) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Single-item cardinality.
    pub fn single(self) -> Self {
        self.with_max_items(Some(1))
    }

    pub fn is_single(&self) -> bool {
        self.max_items == Some(1)
    }

    pub fn exceeds_cardinality(&self, count: usize) -> bool {
        self.max_items.is_some_and(|max| count > max as usize)
    }

    /// The accept list in the comma separated form a native picker understands.
    pub fn accept_string(&self) -> String {
        self.accept.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    }
}

use thiserror::Error;

/// Reasons a pattern is rejected at registration time.
///
/// All of them describe a configuration mistake, so the tree is left exactly
/// as it was before the failed call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The same pattern is already registered in this tree.
    #[error("a handler is already registered for path '{pattern}'")]
    DuplicateRoute { pattern: String },

    /// A different wildcard already occupies this position of the tree.
    #[error("'{wildcard}' in new path '{pattern}' conflicts with existing wildcard '{existing}'")]
    WildcardConflict {
        pattern: String,
        wildcard: String,
        existing: String,
    },

    /// `*name` must be the last segment.
    #[error("catch-all routes are only allowed at the end of the path in path '{pattern}'")]
    CatchAllNotTrailing { pattern: String },

    /// `*name` must directly follow a `/`.
    #[error("no / before catch-all in path '{pattern}'")]
    CatchAllMissingSlash { pattern: String },

    /// A bare `:` or `*` without a name.
    #[error("wildcards must be named with a non-empty name in path '{pattern}'")]
    EmptyWildcardName { pattern: String },

    /// Two wildcards inside one segment, e.g. `/:name.:ext`.
    #[error("only one wildcard per path segment is allowed, has: '{segment}' in path '{pattern}'")]
    MultipleWildcards { pattern: String, segment: String },
}

impl InsertError {
    /// The pattern whose registration failed.
    pub fn pattern(&self) -> &str {
        match self {
            InsertError::DuplicateRoute { pattern }
            | InsertError::WildcardConflict { pattern, .. }
            | InsertError::CatchAllNotTrailing { pattern }
            | InsertError::CatchAllMissingSlash { pattern }
            | InsertError::EmptyWildcardName { pattern }
            | InsertError::MultipleWildcards { pattern, .. } => pattern,
        }
    }
}

/// A method token outside the set the router keeps trees for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown http method '{0}'")]
pub struct UnknownMethod(pub String);

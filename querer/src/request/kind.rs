//! Request stage kinds.

use crate::scheme::SchemeStage;
use std::fmt;

/// The built-in request stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStageKind {
    /// Sets the HTTP method.
    Method,
    /// Sets the target address.
    Url,
    /// Sets the body.
    Content,
    /// Appends headers.
    Headers,
    /// Registers a raw mutation applied to the finished request.
    Mutation,
}

impl SchemeStage for RequestStageKind {
    const CANONICAL: &'static [Self] = &[
        Self::Method,
        Self::Url,
        Self::Content,
        Self::Headers,
        Self::Mutation,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Url => "url",
            Self::Content => "content",
            Self::Headers => "headers",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for RequestStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Response stage kinds.

use crate::scheme::SchemeStage;
use std::fmt;

/// The built-in response handling stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerStageKind {
    /// Admits or rejects the response.
    Precondition,
    /// Produces the typed value.
    Extraction,
}

impl SchemeStage for HandlerStageKind {
    const CANONICAL: &'static [Self] = &[Self::Precondition, Self::Extraction];

    fn name(self) -> &'static str {
        match self {
            Self::Precondition => "precondition",
            Self::Extraction => "extraction",
        }
    }
}

impl fmt::Display for HandlerStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

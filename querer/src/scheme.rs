//! Ordered stage selection.
//!
//! A [`Scheme`] lists which stages of a pipeline run and in what order. The
//! canonical order is declared by the stage kind; callers narrow it with
//! [`Scheme::select`] and change it only through [`Scheme::reorder`].

use crate::errors::ConfigurationError;
use std::fmt;

/// A kind of stage that can appear in a scheme.
pub trait SchemeStage: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Every kind, in canonical order.
    const CANONICAL: &'static [Self];

    /// Returns the stage name used in logs and errors.
    fn name(self) -> &'static str;
}

/// An ordered, duplicate-free list of stage kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme<K: SchemeStage> {
    stages: Vec<K>,
}

impl<K: SchemeStage> Scheme<K> {
    /// Returns the canonical scheme containing every stage.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            stages: K::CANONICAL.to_vec(),
        }
    }

    /// Builds a scheme with an explicit order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateStage`] if a kind is listed twice.
    pub fn reorder(kinds: impl IntoIterator<Item = K>) -> Result<Self, ConfigurationError> {
        let mut stages: Vec<K> = Vec::new();
        for kind in kinds {
            if stages.contains(&kind) {
                return Err(ConfigurationError::DuplicateStage { stage: kind.name() });
            }
            stages.push(kind);
        }
        Ok(Self { stages })
    }

    /// Keeps only the listed kinds, preserving this scheme's order.
    #[must_use]
    pub fn select(&self, kinds: &[K]) -> Self {
        Self {
            stages: self
                .stages
                .iter()
                .copied()
                .filter(|stage| kinds.contains(stage))
                .collect(),
        }
    }

    /// Removes a kind.
    #[must_use]
    pub fn without(mut self, kind: K) -> Self {
        self.stages.retain(|stage| *stage != kind);
        self
    }

    /// Returns true if the kind is part of the scheme.
    #[must_use]
    pub fn contains(&self, kind: K) -> bool {
        self.stages.contains(&kind)
    }

    /// Iterates over the kinds in execution order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.stages.iter().copied()
    }

    /// Returns the kinds in execution order.
    #[must_use]
    pub fn stages(&self) -> &[K] {
        &self.stages
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if no stage is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<K: SchemeStage> Default for Scheme<K> {
    fn default() -> Self {
        Self::standard()
    }
}

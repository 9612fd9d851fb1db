//! Normalized subject taxonomy
//!
//! The upstream source attaches a large free-form subject vocabulary to
//! each bill; read paths only ever filter on this small fixed set. The
//! mapping from raw terms to the taxonomy is the job of a
//! [`SubjectNormalizer`] collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Fixed set of subject categories bills are normalized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Healthcare,
    Economy,
    Defense,
    Education,
    Environment,
    Energy,
    Immigration,
    Justice,
    Technology,
    Infrastructure,
    Agriculture,
    Veterans,
}

impl Subject {
    /// All allowed categories
    pub const ALL: [Subject; 12] = [
        Subject::Healthcare,
        Subject::Economy,
        Subject::Defense,
        Subject::Education,
        Subject::Environment,
        Subject::Energy,
        Subject::Immigration,
        Subject::Justice,
        Subject::Technology,
        Subject::Infrastructure,
        Subject::Agriculture,
        Subject::Veterans,
    ];

    /// Stable label used in API parameters and stored documents
    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthcare => "healthcare",
            Self::Economy => "economy",
            Self::Defense => "defense",
            Self::Education => "education",
            Self::Environment => "environment",
            Self::Energy => "energy",
            Self::Immigration => "immigration",
            Self::Justice => "justice",
            Self::Technology => "technology",
            Self::Infrastructure => "infrastructure",
            Self::Agriculture => "agriculture",
            Self::Veterans => "veterans",
        }
    }

    /// Parse an API-facing label, rejecting anything outside the taxonomy
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .find(|s| s.label() == label.trim().to_lowercase())
            .copied()
            .ok_or_else(|| DomainError::validation(format!("Unknown subject '{}'", label)))
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Maps a raw upstream taxonomy term into the fixed subject set
///
/// Returns `None` for terms with no category; normalization never fails.
#[cfg_attr(test, mockall::automock)]
pub trait SubjectNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> Option<Subject>;
}

//! Subject normalization
//!
//! The upstream vocabulary has thousands of terms; this maps each term
//! onto the fixed [`Subject`] taxonomy by keyword, first match wins.
//! Terms with no match normalize to nothing and simply carry no
//! category.

use once_cell::sync::Lazy;

use crate::domain::{Subject, SubjectNormalizer};

/// Match table evaluated in order; more specific categories come first
/// so e.g. veterans' healthcare terms land on veterans, not healthcare
static KEYWORD_TABLE: Lazy<Vec<(Subject, Vec<&'static str>)>> = Lazy::new(|| {
    vec![
        (Subject::Veterans, vec!["veteran"]),
        (
            Subject::Immigration,
            vec!["immigra", "border security", "citizenship", "refugee", "visa"],
        ),
        (
            Subject::Healthcare,
            vec![
                "health",
                "medicare",
                "medicaid",
                "hospital",
                "prescription",
                "drug",
                "disease",
            ],
        ),
        (
            Subject::Energy,
            vec!["energy", "oil and gas", "electric", "nuclear", "renewable", "solar", "wind power"],
        ),
        (
            Subject::Environment,
            vec![
                "environment",
                "climate",
                "wildlife",
                "water resources",
                "pollution",
                "conservation",
                "public lands",
            ],
        ),
        (
            Subject::Defense,
            vec!["armed forces", "defense", "military", "national security", "intelligence"],
        ),
        (
            Subject::Education,
            vec!["education", "school", "student", "teacher"],
        ),
        (
            Subject::Infrastructure,
            vec![
                "infrastructure",
                "transportation",
                "highway",
                "housing",
                "broadband",
                "aviation",
                "railroad",
            ],
        ),
        (
            Subject::Agriculture,
            vec!["agricultur", "farm", "food", "rural", "livestock"],
        ),
        (
            Subject::Technology,
            vec!["technology", "internet", "telecommunications", "science", "artificial intelligence", "data privacy"],
        ),
        (
            Subject::Justice,
            vec![
                "crime",
                "criminal",
                "justice",
                "law enforcement",
                "civil rights",
                "courts",
                "judiciary",
            ],
        ),
        (
            Subject::Economy,
            vec![
                "econom",
                "tax",
                "budget",
                "finance",
                "commerce",
                "labor",
                "employment",
                "trade",
                "banking",
                "small business",
            ],
        ),
    ]
});

/// Keyword-table implementation of [`SubjectNormalizer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSubjectNormalizer;

impl KeywordSubjectNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl SubjectNormalizer for KeywordSubjectNormalizer {
    fn normalize(&self, raw: &str) -> Option<Subject> {
        let term = raw.to_lowercase();

        KEYWORD_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| term.contains(k)))
            .map(|(subject, _)| *subject)
    }
}

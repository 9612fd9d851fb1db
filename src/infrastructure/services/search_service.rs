//! Cached bill search
//!
//! Cache-first with a live fallback: subject filters use the store's
//! "contains any" query (re-verified in process against an over-broad
//! index match), free-text terms substring-match across title, sponsor,
//! subject labels, bill number, and latest action. When the cache path
//! errors or matches nothing, the live feed path answers instead and the
//! result is annotated as a fallback.

use std::sync::Arc;

use metrics::counter;
use tracing::warn;

use crate::domain::cache::BillStore;
use crate::domain::{Bill, DomainError, Subject};

use super::{rank_bills, FeedService, ResultOrigin};

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Recent cache entries scanned for unfiltered term searches
    pub scan_limit: usize,
    /// Hard cap on returned results
    pub max_results: usize,
    /// Minimum characters in a free-text term
    pub min_term_len: usize,
    /// Congress used when the live fallback has to pull fresh data
    pub congress: u16,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_limit: 200,
            max_results: 50,
            min_term_len: 2,
            congress: 119,
        }
    }
}

/// A validated-on-entry search request
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub subjects: Vec<Subject>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn subjects(subjects: Vec<Subject>) -> Self {
        Self {
            subjects,
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Search results plus provenance
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub bills: Vec<Bill>,
    pub origin: ResultOrigin,
}

/// Serves subject- and term-filtered bill search
pub struct SearchService {
    store: Arc<dyn BillStore>,
    feed: Arc<FeedService>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn BillStore>, feed: Arc<FeedService>, config: SearchConfig) -> Self {
        Self {
            store,
            feed,
            config,
        }
    }

    /// Run a search; free of side effects beyond instrumentation
    pub async fn search(&self, query: SearchQuery) -> Result<SearchPage, DomainError> {
        let term = self.validate_term(query.term.as_deref())?;

        if term.is_none() && query.subjects.is_empty() {
            return Err(DomainError::validation(
                "Provide a search term or at least one subject filter",
            ));
        }

        let limit = query
            .limit
            .unwrap_or(self.config.max_results)
            .min(self.config.max_results);

        match self.cached_matches(&query.subjects, term.as_deref(), limit).await {
            Ok(bills) if !bills.is_empty() => {
                counter!("search_cache_hits_total").increment(1);
                Ok(SearchPage {
                    bills,
                    origin: ResultOrigin::Cache,
                })
            }
            Ok(empty) => {
                // Nothing usable cached; try live, but an empty cached
                // answer still beats surfacing a fallback error
                match self.live_matches(&query.subjects, term.as_deref(), limit).await {
                    Ok(bills) => Ok(SearchPage {
                        bills,
                        origin: ResultOrigin::LiveFallback,
                    }),
                    Err(e) => {
                        warn!(error = %e, "Live search fallback failed; returning empty cached result");
                        Ok(SearchPage {
                            bills: empty,
                            origin: ResultOrigin::Cache,
                        })
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Cache search failed; falling back to live");
                counter!("search_live_fallbacks_total").increment(1);
                let bills = self.live_matches(&query.subjects, term.as_deref(), limit).await?;
                Ok(SearchPage {
                    bills,
                    origin: ResultOrigin::LiveFallback,
                })
            }
        }
    }

    fn validate_term(&self, term: Option<&str>) -> Result<Option<String>, DomainError> {
        match term {
            None => Ok(None),
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                if trimmed.chars().count() < self.config.min_term_len {
                    return Err(DomainError::validation(format!(
                        "Search term must be at least {} characters",
                        self.config.min_term_len
                    )));
                }
                Ok(Some(trimmed.to_lowercase()))
            }
        }
    }

    async fn cached_matches(
        &self,
        subjects: &[Subject],
        term: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Bill>, DomainError> {
        let candidates: Vec<Bill> = if subjects.is_empty() {
            self.store
                .recent(None, self.config.scan_limit, 0)
                .await?
                .into_iter()
                .map(|e| e.bill)
                .collect()
        } else {
            // Re-verify in process: the index query may over-match
            self.store
                .with_any_subject(subjects, self.config.scan_limit)
                .await?
                .into_iter()
                .map(|e| e.bill)
                .filter(|b| b.matches_any_subject(subjects))
                .collect()
        };

        Ok(filter_and_rank(candidates, subjects, term, limit))
    }

    async fn live_matches(
        &self,
        subjects: &[Subject],
        term: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Bill>, DomainError> {
        let bills = self.feed.live_bills(self.config.congress).await?;
        Ok(filter_and_rank(bills, subjects, term, limit))
    }
}

fn filter_and_rank(
    bills: Vec<Bill>,
    subjects: &[Subject],
    term: Option<&str>,
    limit: usize,
) -> Vec<Bill> {
    let mut matches: Vec<Bill> = bills
        .into_iter()
        .filter(|b| subjects.is_empty() || b.matches_any_subject(subjects))
        .filter(|b| term.is_none_or(|t| bill_matches_term(b, t)))
        .collect();

    rank_bills(&mut matches);
    matches.truncate(limit);
    matches
}

/// Case-insensitive substring match; any field qualifies
fn bill_matches_term(bill: &Bill, term_lower: &str) -> bool {
    if bill.title.to_lowercase().contains(term_lower) {
        return true;
    }

    if let Some(short_title) = &bill.short_title {
        if short_title.to_lowercase().contains(term_lower) {
            return true;
        }
    }

    if let Some(sponsor) = &bill.sponsor {
        if sponsor.name.to_lowercase().contains(term_lower) {
            return true;
        }
    }

    if bill.subjects.iter().any(|s| s.label().contains(term_lower)) {
        return true;
    }

    // Bill number in its common written forms
    let number_forms = [
        bill.id.key(),
        bill.id.citation().to_lowercase(),
        format!("{}{}", bill.id.bill_type(), bill.id.number()),
        format!("{} {}", bill.id.bill_type(), bill.id.number()),
        bill.id.number().to_string(),
    ];
    if number_forms.iter().any(|form| form.contains(term_lower)) {
        return true;
    }

    bill.latest_action_text().to_lowercase().contains(term_lower)
}

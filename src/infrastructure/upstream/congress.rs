//! HTTP client for the upstream congressional data source
//!
//! Plain GETs with a query-string API key. Every request carries an
//! explicit timeout: the bulk list endpoint gets the long one, per-bill
//! lookups the short one. Timeouts, connect failures, and non-2xx all
//! surface as the upstream error variant so callers treat them alike.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::source::{BillSource, BillSummary};
use crate::domain::{BillId, BillType, Chamber, DomainError, LatestAction, Sponsor};

/// Upstream client configuration
#[derive(Debug, Clone)]
pub struct CongressApiConfig {
    /// Base URL, e.g. "https://api.congress.gov/v3"
    pub base_url: String,
    /// API key sent as the `api_key` query parameter
    pub api_key: String,
    /// Timeout for the bulk recent-bills list
    pub list_timeout: Duration,
    /// Timeout for single-bill and subjects lookups
    pub item_timeout: Duration,
}

impl CongressApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            list_timeout: Duration::from_secs(30),
            item_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = timeout;
        self
    }
}

/// Reqwest-backed implementation of [`BillSource`]
#[derive(Debug, Clone)]
pub struct CongressApiClient {
    client: reqwest::Client,
    config: CongressApiConfig,
}

impl CongressApiClient {
    pub fn new(config: CongressApiConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.list_timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, DomainError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("format", "json"), ("api_key", self.config.api_key.as_str())])
            .timeout(timeout)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(DomainError::upstream(format!(
                "Upstream returned HTTP {} for {}",
                response.status(),
                path
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::upstream(format!("Failed to parse upstream response: {}", e)))
    }
}

fn map_request_error(err: reqwest::Error) -> DomainError {
    if err.is_timeout() {
        DomainError::upstream("Upstream request timed out")
    } else {
        DomainError::upstream(format!("Upstream request failed: {}", err))
    }
}

#[async_trait]
impl BillSource for CongressApiClient {
    async fn recent_bills(
        &self,
        congress: u16,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<BillSummary>, DomainError> {
        let path = format!("bill/{}", congress);
        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
            ("sort", "updateDate desc".to_string()),
        ];

        let response: BillListResponse = self
            .get_json(&path, &query, self.config.list_timeout)
            .await?;

        response.bills.into_iter().map(BillDto::into_summary).collect()
    }

    async fn bill(&self, id: &BillId) -> Result<BillSummary, DomainError> {
        let path = format!("bill/{}/{}/{}", id.congress(), id.bill_type(), id.number());

        let response: BillItemResponse =
            self.get_json(&path, &[], self.config.item_timeout).await?;

        response.bill.into_summary()
    }

    async fn subjects(&self, id: &BillId) -> Result<Vec<String>, DomainError> {
        let path = format!(
            "bill/{}/{}/{}/subjects",
            id.congress(),
            id.bill_type(),
            id.number()
        );

        let response: SubjectsResponse =
            self.get_json(&path, &[], self.config.item_timeout).await?;

        let mut subjects: Vec<String> = response
            .subjects
            .legislative_subjects
            .into_iter()
            .map(|s| s.name)
            .collect();

        if let Some(policy_area) = response.subjects.policy_area {
            subjects.push(policy_area.name);
        }

        Ok(subjects)
    }
}

// ----------------------------------------------------------------------------
// Wire types
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BillListResponse {
    #[serde(default)]
    bills: Vec<BillDto>,
}

#[derive(Debug, Deserialize)]
struct BillItemResponse {
    bill: BillDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BillDto {
    congress: u16,
    #[serde(rename = "type")]
    bill_type: String,
    number: u32,
    title: String,
    #[serde(default)]
    short_title: Option<String>,
    #[serde(default)]
    origin_chamber: Option<String>,
    update_date: DateTime<Utc>,
    #[serde(default)]
    latest_action: Option<ActionDto>,
    #[serde(default)]
    sponsor: Option<SponsorDto>,
    #[serde(default)]
    cosponsor_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActionDto {
    text: String,
    #[serde(default)]
    action_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorDto {
    full_name: String,
    #[serde(default)]
    party: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectsResponse {
    subjects: SubjectsDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectsDto {
    #[serde(default)]
    legislative_subjects: Vec<NamedDto>,
    #[serde(default)]
    policy_area: Option<NamedDto>,
}

#[derive(Debug, Deserialize)]
struct NamedDto {
    name: String,
}

impl BillDto {
    fn into_summary(self) -> Result<BillSummary, DomainError> {
        let bill_type = BillType::from_str(&self.bill_type)
            .map_err(|e| DomainError::upstream(format!("Unexpected upstream bill type: {}", e)))?;
        let id = BillId::new(self.congress, bill_type, self.number)
            .map_err(|e| DomainError::upstream(format!("Unexpected upstream bill id: {}", e)))?;

        let origin_chamber = match self.origin_chamber.as_deref() {
            Some("House") => Some(Chamber::House),
            Some("Senate") => Some(Chamber::Senate),
            _ => None,
        };

        let latest_action = self.latest_action.map(|a| LatestAction {
            text: a.text,
            action_date: a.action_date,
        });

        let sponsor = self.sponsor.map(|s| Sponsor {
            name: s.full_name,
            party: s.party,
            image_url: s.image_url,
        });

        Ok(BillSummary {
            id,
            title: self.title,
            short_title: self.short_title,
            origin_chamber,
            update_date: self.update_date,
            latest_action,
            sponsor,
            cosponsor_count: self.cosponsor_count,
        })
    }
}

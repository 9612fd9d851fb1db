//! Bill entity and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::subject::Subject;
use super::validation::{validate_congress, BillValidationError};

/// Congressional bill type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Hr,
    S,
    Hjres,
    Sjres,
    Hconres,
    Sconres,
    Hres,
    Sres,
}

impl BillType {
    /// Lowercase code used in bill keys and upstream URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hr => "hr",
            Self::S => "s",
            Self::Hjres => "hjres",
            Self::Sjres => "sjres",
            Self::Hconres => "hconres",
            Self::Sconres => "sconres",
            Self::Hres => "hres",
            Self::Sres => "sres",
        }
    }

    /// Citation-style label, e.g. "H.R." for house bills
    pub fn citation(&self) -> &'static str {
        match self {
            Self::Hr => "H.R.",
            Self::S => "S.",
            Self::Hjres => "H.J.Res.",
            Self::Sjres => "S.J.Res.",
            Self::Hconres => "H.Con.Res.",
            Self::Sconres => "S.Con.Res.",
            Self::Hres => "H.Res.",
            Self::Sres => "S.Res.",
        }
    }
}

impl std::fmt::Display for BillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BillType {
    type Err = BillValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hr" => Ok(Self::Hr),
            "s" => Ok(Self::S),
            "hjres" => Ok(Self::Hjres),
            "sjres" => Ok(Self::Sjres),
            "hconres" => Ok(Self::Hconres),
            "sconres" => Ok(Self::Sconres),
            "hres" => Ok(Self::Hres),
            "sres" => Ok(Self::Sres),
            other => Err(BillValidationError::UnknownBillType(other.to_string())),
        }
    }
}

/// Chamber of origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    House,
    Senate,
}

/// Composite bill identity: (congress, bill type, number)
///
/// Immutable once assigned; `key()` is the document key in the
/// persistent cache store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillId {
    congress: u16,
    bill_type: BillType,
    number: u32,
}

impl BillId {
    /// Create a new BillId after validating the congress number
    pub fn new(congress: u16, bill_type: BillType, number: u32) -> Result<Self, BillValidationError> {
        validate_congress(congress)?;
        Ok(Self {
            congress,
            bill_type,
            number,
        })
    }

    pub fn congress(&self) -> u16 {
        self.congress
    }

    pub fn bill_type(&self) -> BillType {
        self.bill_type
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Document key, e.g. "119-hr-1234"
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.congress, self.bill_type, self.number)
    }

    /// Citation string, e.g. "H.R. 1234"
    pub fn citation(&self) -> String {
        format!("{} {}", self.bill_type.citation(), self.number)
    }
}

impl std::fmt::Display for BillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Bill sponsor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sponsor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Sponsor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            party: None,
            image_url: None,
        }
    }

    pub fn with_party(mut self, party: impl Into<String>) -> Self {
        self.party = Some(party.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Most recent recorded action on a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestAction {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_date: Option<NaiveDate>,
}

impl LatestAction {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action_date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.action_date = Some(date);
        self
    }
}

/// A single piece of legislation as ingested from the upstream source
///
/// The importance score is derived at ingestion time and never mutated
/// by readers; normalized subjects are always a subset of the fixed
/// [`Subject`] taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_chamber: Option<Chamber>,
    pub update_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_action: Option<LatestAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsor: Option<Sponsor>,
    #[serde(default)]
    pub cosponsor_count: u32,
    #[serde(default)]
    pub raw_subjects: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub score: u32,
}

impl Bill {
    pub fn new(id: BillId, title: impl Into<String>, update_date: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            short_title: None,
            origin_chamber: None,
            update_date,
            latest_action: None,
            sponsor: None,
            cosponsor_count: 0,
            raw_subjects: Vec::new(),
            subjects: Vec::new(),
            score: 0,
        }
    }

    pub fn with_short_title(mut self, title: impl Into<String>) -> Self {
        self.short_title = Some(title.into());
        self
    }

    pub fn with_origin_chamber(mut self, chamber: Chamber) -> Self {
        self.origin_chamber = Some(chamber);
        self
    }

    pub fn with_latest_action(mut self, action: LatestAction) -> Self {
        self.latest_action = Some(action);
        self
    }

    pub fn with_sponsor(mut self, sponsor: Sponsor) -> Self {
        self.sponsor = Some(sponsor);
        self
    }

    pub fn with_cosponsor_count(mut self, count: u32) -> Self {
        self.cosponsor_count = count;
        self
    }

    pub fn with_subjects(mut self, raw: Vec<String>, normalized: Vec<Subject>) -> Self {
        self.raw_subjects = raw;
        self.subjects = normalized;
        self
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }

    /// Latest-action text, or empty when the upstream record has none
    pub fn latest_action_text(&self) -> &str {
        self.latest_action.as_ref().map(|a| a.text.as_str()).unwrap_or("")
    }

    /// True when any of the bill's normalized subjects appears in `wanted`
    pub fn matches_any_subject(&self, wanted: &[Subject]) -> bool {
        self.subjects.iter().any(|s| wanted.contains(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill_id() -> BillId {
        BillId::new(119, BillType::Hr, 1234).unwrap()
    }

    #[test]
    fn test_bill_type_round_trip() {
        for raw in ["hr", "s", "hjres", "sjres", "hconres", "sconres", "hres", "sres"] {
            let parsed: BillType = raw.parse().unwrap();
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn test_bill_type_parse_unknown() {
        let result = "amendment".parse::<BillType>();
        assert!(result.is_err());
    }

    #[test]
    fn test_bill_id_key() {
        assert_eq!(bill_id().key(), "119-hr-1234");
    }

    #[test]
    fn test_bill_id_citation() {
        assert_eq!(bill_id().citation(), "H.R. 1234");

        let senate = BillId::new(119, BillType::S, 42).unwrap();
        assert_eq!(senate.citation(), "S. 42");
    }

    #[test]
    fn test_bill_id_rejects_invalid_congress() {
        assert!(BillId::new(0, BillType::Hr, 1).is_err());
    }

    #[test]
    fn test_bill_builder() {
        let bill = Bill::new(bill_id(), "Test Act", Utc::now())
            .with_origin_chamber(Chamber::House)
            .with_sponsor(Sponsor::new("Rep. Doe").with_party("I"))
            .with_cosponsor_count(12)
            .with_latest_action(LatestAction::new("Referred to the Committee on Rules."));

        assert_eq!(bill.cosponsor_count, 12);
        assert_eq!(bill.sponsor.as_ref().unwrap().party.as_deref(), Some("I"));
        assert_eq!(
            bill.latest_action_text(),
            "Referred to the Committee on Rules."
        );
    }

    #[test]
    fn test_latest_action_text_defaults_to_empty() {
        let bill = Bill::new(bill_id(), "Test Act", Utc::now());
        assert_eq!(bill.latest_action_text(), "");
    }

    #[test]
    fn test_matches_any_subject() {
        let bill = Bill::new(bill_id(), "Test Act", Utc::now())
            .with_subjects(vec!["Energy".into()], vec![Subject::Energy]);

        assert!(bill.matches_any_subject(&[Subject::Energy, Subject::Defense]));
        assert!(!bill.matches_any_subject(&[Subject::Healthcare]));
    }

    #[test]
    fn test_bill_serde_round_trip() {
        let bill = Bill::new(bill_id(), "Test Act", Utc::now())
            .with_subjects(vec!["Taxation".into()], vec![Subject::Economy])
            .with_score(43);

        let json = serde_json::to_string(&bill).unwrap();
        let back: Bill = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, bill.id);
        assert_eq!(back.score, 43);
        assert_eq!(back.subjects, vec![Subject::Economy]);
    }
}

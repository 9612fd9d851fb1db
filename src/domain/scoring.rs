//! Bill importance scoring
//!
//! Pure, deterministic point system over a bill's latest-action text,
//! title, cosponsor count, and recency. Recomputed in full at ingestion
//! time; readers only ever sort on the stored result. Bonuses from
//! different rule families stack; only the cosponsor bands and the
//! committee tier are exclusive within themselves.

use chrono::{DateTime, Duration, Utc};

use super::bill::Bill;

/// Title keywords that mark high-impact policy areas
const HIGH_IMPACT_KEYWORDS: &[&str] = &[
    "budget",
    "defense",
    "healthcare",
    "tax",
    "climate",
    "energy",
    "education",
    "infrastructure",
    "economy",
    "security",
];

const ENACTED_POINTS: u32 = 50;
const TO_EXECUTIVE_POINTS: u32 = 40;
const PASSED_BOTH_POINTS: u32 = 35;
const PASSED_ONE_POINTS: u32 = 25;
const FLOOR_VOTE_POINTS: u32 = 30;
const REPORTED_POINTS: u32 = 15;
const COMMITTEE_ACTIVITY_POINTS: u32 = 8;
const REFERRAL_POINTS: u32 = 2;
const TOPIC_POINTS: u32 = 10;
const BIPARTISAN_POINTS: u32 = 15;
const RECENT_ACTION_POINTS: u32 = 3;
const RECENT_ACTION_WINDOW_DAYS: i64 = 7;

/// Compute the importance score for a bill
///
/// `now` is the scoring time; callers pass it in from the injected
/// clock so repeated calls on identical inputs are identical.
pub fn score_bill(bill: &Bill, now: DateTime<Utc>) -> u32 {
    let mut score = action_points(bill.latest_action_text());
    score += title_points(&bill.title);
    score += cosponsor_points(bill.cosponsor_count);

    if let Some(date) = bill.latest_action.as_ref().and_then(|a| a.action_date) {
        let age = now.date_naive().signed_duration_since(date);
        if age >= Duration::zero() && age <= Duration::days(RECENT_ACTION_WINDOW_DAYS) {
            score += RECENT_ACTION_POINTS;
        }
    }

    score
}

/// Points from the latest-action text
///
/// Absent text behaves as the empty string; text matching nothing is a
/// baseline introduced bill and contributes no points.
fn action_points(text: &str) -> u32 {
    let t = text.to_lowercase();
    let mut points = 0;

    if t.contains("became public law") || t.contains("signed into law") || t.contains("became law")
    {
        points += ENACTED_POINTS;
    }

    if t.contains("presented to president") || t.contains("sent to president") {
        points += TO_EXECUTIVE_POINTS;
    }

    let passed_house = t.contains("passed house")
        || t.contains("passed the house")
        || t.contains("agreed to in house");
    let passed_senate = t.contains("passed senate")
        || t.contains("passed the senate")
        || t.contains("agreed to in senate");

    points += match (passed_house, passed_senate) {
        (true, true) => PASSED_BOTH_POINTS,
        (true, false) | (false, true) => PASSED_ONE_POINTS,
        (false, false) if t.contains("cleared for the white house") => PASSED_BOTH_POINTS,
        _ => 0,
    };

    if t.contains("vote") || t.contains("cloture") || (t.contains("placed on") && t.contains("calendar"))
    {
        points += FLOOR_VOTE_POINTS;
    }

    // Committee tier: reported beats activity beats a bare referral
    if t.contains("reported") {
        points += REPORTED_POINTS;
    } else if t.contains("referred to") {
        points += REFERRAL_POINTS;
    } else if t.contains("committee") || t.contains("markup") || t.contains("hearing") {
        points += COMMITTEE_ACTIVITY_POINTS;
    }

    points
}

fn title_points(title: &str) -> u32 {
    let t = title.to_lowercase();
    let mut points = 0;

    if HIGH_IMPACT_KEYWORDS.iter().any(|k| t.contains(k)) {
        points += TOPIC_POINTS;
    }

    if t.contains("bipartisan") {
        points += BIPARTISAN_POINTS;
    }

    points
}

/// Mutually exclusive bands, highest applicable only
fn cosponsor_points(count: u32) -> u32 {
    if count > 50 {
        12
    } else if count > 20 {
        8
    } else if count > 10 {
        5
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::bill::{BillId, BillType, LatestAction};

    fn scoring_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn bill(title: &str, action: &str, cosponsors: u32) -> Bill {
        let id = BillId::new(119, BillType::Hr, 1).unwrap();
        let mut b = Bill::new(id, title, scoring_time()).with_cosponsor_count(cosponsors);
        if !action.is_empty() {
            b = b.with_latest_action(LatestAction::new(action));
        }
        b
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let b = bill("Bipartisan Defense Budget Act", "Passed Senate by voice vote.", 60);
        let now = scoring_time();

        assert_eq!(score_bill(&b, now), score_bill(&b, now));
    }

    #[test]
    fn test_score_scenario_passed_senate_energy_bill() {
        // 25 (passed one chamber) + 10 (topic keyword) + 8 (cosponsor band)
        let b = bill(
            "Clean Energy Infrastructure Investment Act",
            "Passed Senate",
            25,
        );

        let score = score_bill(&b, scoring_time());
        assert_eq!(score, 43);
        assert!(score >= 43);
    }

    #[test]
    fn test_enacted_outranks_bare_referral() {
        let law = bill("An Act", "Became Public Law No: 119-21.", 0);
        let referred = bill("An Act", "Referred to the Committee on Ways and Means.", 0);

        assert!(score_bill(&law, scoring_time()) >= score_bill(&referred, scoring_time()));
    }

    #[test]
    fn test_missing_action_text_scores_without_error() {
        let b = bill("Some Minor Act", "", 0);
        assert_eq!(score_bill(&b, scoring_time()), 0);
    }

    #[test]
    fn test_unrecognized_action_text_is_baseline() {
        let b = bill("Some Minor Act", "Message on Senate action received.", 0);
        assert_eq!(score_bill(&b, scoring_time()), 0);
    }

    #[test]
    fn test_passed_both_chambers_is_single_bonus() {
        assert_eq!(action_points("Passed House; previously Passed Senate."), 35);
    }

    #[test]
    fn test_floor_vote_stacks_with_passage() {
        // 25 for the chamber + 30 for the recorded vote
        assert_eq!(action_points("Passed House by roll call vote."), 55);
    }

    #[test]
    fn test_presented_to_president() {
        assert_eq!(action_points("Presented to President."), 40);
    }

    #[test]
    fn test_committee_tier_is_exclusive() {
        assert_eq!(
            action_points("Reported by the Committee on Armed Services."),
            15
        );
        assert_eq!(action_points("Committee hearings held."), 8);
        assert_eq!(
            action_points("Referred to the Committee on the Judiciary."),
            2
        );
    }

    #[test]
    fn test_title_keyword_bonus_applies_once() {
        // "energy" and "infrastructure" both match, bonus counted once
        let b = bill("Energy and Infrastructure Act", "", 0);
        assert_eq!(score_bill(&b, scoring_time()), 10);
    }

    #[test]
    fn test_bipartisan_title_bonus() {
        let b = bill("Bipartisan Postal Naming Act", "", 0);
        assert_eq!(score_bill(&b, scoring_time()), 15);
    }

    #[test]
    fn test_cosponsor_bands() {
        assert_eq!(cosponsor_points(10), 0);
        assert_eq!(cosponsor_points(11), 5);
        assert_eq!(cosponsor_points(21), 8);
        assert_eq!(cosponsor_points(50), 8);
        assert_eq!(cosponsor_points(51), 12);
    }

    #[test]
    fn test_recent_action_bonus() {
        let now = scoring_time();
        let recent = bill("Plain Act", "", 0).with_latest_action(
            LatestAction::new("Referred to the Subcommittee on Health.")
                .with_date(now.date_naive() - Duration::days(3)),
        );
        let old = bill("Plain Act", "", 0).with_latest_action(
            LatestAction::new("Referred to the Subcommittee on Health.")
                .with_date(now.date_naive() - Duration::days(30)),
        );

        assert_eq!(score_bill(&recent, now), score_bill(&old, now) + 3);
    }
}

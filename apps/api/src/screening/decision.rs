//! Outcome routing — the decision table applied once both classifiers have
//! produced a label.

use serde::Serialize;

/// Terminal routing outcome for one screening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Interview,
    Escalation,
    Rejection,
}

impl Outcome {
    /// Fixed message reported to the caller for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Interview => "Candidate has been shortlisted for an HR interview.",
            Outcome::Escalation => {
                "Candidate has senior-level experience but doesn't match skills; \
                 escalating to recruiter."
            }
            Outcome::Rejection => "Candidate does not meet requirements and has been rejected.",
        }
    }
}

/// Canonicalizes a classifier label for comparison: trims surrounding
/// whitespace, drops trailing space-or-period runs, lowercases. Idempotent;
/// interior content is untouched.
pub fn normalize(label: &str) -> String {
    label.trim().trim_end_matches([' ', '.']).to_lowercase()
}

/// Routes a candidate given the raw experience-level and skill-match labels.
///
/// Skill match dominates: a matching candidate is interviewed regardless of
/// seniority. Among non-matches, mid- and senior-level candidates are
/// escalated for human review; everything else — including unrecognized or
/// garbled labels, which free-form model output can produce — falls through
/// to rejection. Total over arbitrary strings, never errors.
pub fn route(experience_level: &str, skill_match: &str) -> Outcome {
    if normalize(skill_match) == "match" {
        return Outcome::Interview;
    }
    let level = normalize(experience_level);
    if level == "mid-level" || level == "senior-level" {
        return Outcome::Escalation;
    }
    Outcome::Rejection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_case_and_trailing_period() {
        assert_eq!(normalize("  Mid-level. "), "mid-level");
        assert_eq!(normalize(" MATCH "), "match");
        assert_eq!(normalize("Senior-level.."), "senior-level");
        assert_eq!(normalize("No Match"), "no match");
    }

    #[test]
    fn test_normalize_preserves_interior_content() {
        assert_eq!(normalize("Mid - level v2.0 beta"), "mid - level v2.0 beta");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in [
            "  Mid-level. ",
            "SENIOR-LEVEL",
            "match .. ",
            "",
            "   ",
            "héllo wörld.",
            "入门级。",
            "weird\u{00a0}stuff",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_match_always_interviews_regardless_of_experience() {
        for skill in ["Match", " MATCH. ", "match", "Match."] {
            for level in ["Entry-level", "Senior-level", "gibberish", ""] {
                assert_eq!(route(level, skill), Outcome::Interview);
            }
        }
    }

    #[test]
    fn test_non_match_mid_or_senior_escalates() {
        assert_eq!(route("Mid-level", "No Match"), Outcome::Escalation);
        assert_eq!(route("Senior-level.", "No Match"), Outcome::Escalation);
        assert_eq!(route(" mid-level ", "no match"), Outcome::Escalation);
    }

    #[test]
    fn test_entry_level_non_match_rejects() {
        assert_eq!(route("Entry-level", "No Match"), Outcome::Rejection);
    }

    #[test]
    fn test_unrecognized_labels_degrade_to_rejection() {
        assert_eq!(route("gibberish-xyz", "no match"), Outcome::Rejection);
        assert_eq!(route("", ""), Outcome::Rejection);
        assert_eq!(route("🦀🦀🦀", "¯\\_(ツ)_/¯"), Outcome::Rejection);
    }

    #[test]
    fn test_messages_for_fixed_outcomes() {
        assert_eq!(
            route("Senior-level", "Match").message(),
            "Candidate has been shortlisted for an HR interview."
        );
        assert!(route("Mid-level.", "No Match")
            .message()
            .contains("escalating to recruiter."));
        assert_eq!(
            route("Entry-level", "No Match").message(),
            "Candidate does not meet requirements and has been rejected."
        );
    }
}

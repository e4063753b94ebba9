//! Keyword intent classifier.
//!
//! Lower-cases the query and checks plain substring membership against a
//! fixed, ordered keyword table. The first intent with a hit wins. There is no
//! tokenization or weighting: `"altid"` contains `"tid"` and classifies as
//! [`Intent::Time`].

use fc_core::enums::Intent;

/// Keyword table in priority order.
pub const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Bugs, &["bug", "fejl", "problem"]),
    (Intent::Features, &["feature", "funktion", "ønske"]),
    (Intent::Knowledge, &["viden", "guide", "hvordan"]),
    (Intent::Time, &["tid", "timer", "arbejde"]),
    (Intent::Team, &["team", "medlemmer", "kollega"]),
];

/// Map a free-text query to an [`Intent`]. Pure and deterministic.
#[must_use]
pub fn classify_intent(query: &str) -> Intent {
    let query = query.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| query.contains(k)))
        .map_or(Intent::General, |(intent, _)| *intent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Vis mig alle åbne bugs", Intent::Bugs)]
    #[case("Der er en FEJL i login", Intent::Bugs)]
    #[case("Hvilke features er godkendt?", Intent::Features)]
    #[case("Jeg har et ønske", Intent::Features)]
    #[case("Hvordan deployer vi?", Intent::Knowledge)]
    #[case("Find en guide til CI", Intent::Knowledge)]
    #[case("Hvor mange timer har jeg logget?", Intent::Time)]
    #[case("Hvem er medlemmer af teamet?", Intent::Team)]
    #[case("Hej med dig", Intent::General)]
    #[case("", Intent::General)]
    fn classifies(#[case] query: &str, #[case] expected: Intent) {
        assert_eq!(classify_intent(query), expected);
    }

    #[test]
    fn earlier_intent_wins() {
        // bug outranks guide and timer
        assert_eq!(classify_intent("guide til bug der tager timer"), Intent::Bugs);
        // feature outranks team
        assert_eq!(classify_intent("team feature"), Intent::Features);
    }

    #[test]
    fn matches_inside_words() {
        assert_eq!(classify_intent("Det virker altid"), Intent::Time);
        assert_eq!(classify_intent("debugging"), Intent::Bugs);
    }

    #[test]
    fn every_bug_keyword_classifies_as_bugs() {
        for keyword in ["bug", "fejl", "problem"] {
            assert_eq!(classify_intent(&format!("noget med {keyword}")), Intent::Bugs);
            assert_eq!(classify_intent(&keyword.to_uppercase()), Intent::Bugs);
        }
    }
}

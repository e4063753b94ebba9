//! Prompt text for the remote completion call.

use std::fmt::Write;

use fc_core::enums::Intent;

use crate::context::ContextBundle;

/// Items per category included in the user prompt.
pub const PROMPT_ITEMS_PER_CATEGORY: usize = 10;

pub const SYSTEM_PROMPT: &str = "Du er FlowCasers assistent for et udviklingsteam. \
Svar kort og præcist på dansk. \
Brug kun de data, du får i konteksten, og opfind aldrig bugs, features, vidensartikler eller timer. \
Hvis konteksten ikke indeholder svaret, så sig det. \
Foretræk punktlister.";

/// The user message: query, intent, and a summary of the bundle.
#[must_use]
pub fn build_user_prompt(query: &str, intent: Intent, bundle: &ContextBundle) -> String {
    let mut prompt = format!("Spørgsmål: {query}\nKategori: {intent}\n");
    if !bundle.matched {
        prompt.push_str("Ingen poster matchede spørgsmålet direkte; her er de seneste.\n");
    }
    if bundle.is_empty() {
        prompt.push_str("\nKontekst: ingen data fundet.\n");
        return prompt;
    }

    if !bundle.bugs.is_empty() {
        prompt.push_str("\nBugs:\n");
        for bug in bundle.bugs.iter().take(PROMPT_ITEMS_PER_CATEGORY) {
            let _ = writeln!(
                prompt,
                "- {} (status: {}, prioritet: {}){}",
                bug.title,
                bug.status,
                bug.priority,
                suffix(bug.description.as_deref())
            );
        }
    }

    if !bundle.features.is_empty() {
        prompt.push_str("\nFeature-ønsker:\n");
        for feature in bundle.features.iter().take(PROMPT_ITEMS_PER_CATEGORY) {
            let _ = writeln!(
                prompt,
                "- {} (status: {}, prioritet: {}, stemmer: {}){}",
                feature.title,
                feature.status,
                feature.priority,
                feature.votes,
                suffix(feature.description.as_deref())
            );
        }
    }

    if !bundle.knowledge.is_empty() {
        prompt.push_str("\nVidensbase:\n");
        for case in bundle.knowledge.iter().take(PROMPT_ITEMS_PER_CATEGORY) {
            let tags = if case.tags.is_empty() {
                String::new()
            } else {
                format!(", tags: {}", case.tags.join(", "))
            };
            let _ = writeln!(
                prompt,
                "- {} (kategori: {}{tags}): {}",
                case.title, case.category, case.content
            );
        }
    }

    if !bundle.time_logs.is_empty() {
        prompt.push_str("\nTidsregistreringer:\n");
        for log in bundle.time_logs.iter().take(PROMPT_ITEMS_PER_CATEGORY) {
            let _ = writeln!(
                prompt,
                "- {}: {} timer på {}{}",
                log.date,
                format_hours(log.hours),
                log.description,
                log.project
                    .as_deref()
                    .map(|p| format!(" (projekt: {p})"))
                    .unwrap_or_default()
            );
        }
        let _ = writeln!(prompt, "Timer i alt: {}", format_hours(bundle.total_hours()));
    }

    prompt
}

/// Hours with a Danish decimal comma and no trailing zeros: `12,5`, `8`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    let rounded = (hours * 100.0).round() / 100.0;
    let text = format!("{rounded:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.replace('.', ",")
}

fn suffix(description: Option<&str>) -> String {
    description
        .filter(|d| !d.trim().is_empty())
        .map(|d| format!(": {d}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(12.5, "12,5")]
    #[case(8.0, "8")]
    #[case(0.25, "0,25")]
    #[case(7.333, "7,33")]
    #[case(0.0, "0")]
    fn hours_use_decimal_comma(#[case] hours: f64, #[case] expected: &str) {
        assert_eq!(format_hours(hours), expected);
    }

    #[test]
    fn empty_bundle_says_no_data() {
        let bundle = ContextBundle::empty(Intent::Knowledge);
        let prompt = build_user_prompt("hvordan deployer vi", Intent::Knowledge, &bundle);
        assert!(prompt.starts_with("Spørgsmål: hvordan deployer vi\nKategori: knowledge\n"));
        assert!(prompt.contains("ingen data fundet"));
    }

    #[test]
    fn system_prompt_is_danish_and_forbids_fabrication() {
        assert!(SYSTEM_PROMPT.contains("dansk"));
        assert!(SYSTEM_PROMPT.contains("opfind aldrig"));
        assert!(SYSTEM_PROMPT.contains("punktlister"));
    }
}

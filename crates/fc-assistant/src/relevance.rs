//! Word-length relevance scoring.
//!
//! `relevance(query, text)` adds up the character length of every
//! space-separated query word that occurs as a substring of the lower-cased
//! text. It is raw character overlap, nothing more: no stemming, no stop
//! words, no document-length normalization.

use fc_core::entities::{Bug, FeatureRequest, KnowledgeCase, TimeLog};

/// Records that expose the concatenated text the assistant searches.
pub trait Searchable {
    fn search_text(&self) -> String;
}

impl Searchable for Bug {
    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or_default())
    }
}

impl Searchable for FeatureRequest {
    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description.as_deref().unwrap_or_default())
    }
}

impl Searchable for KnowledgeCase {
    fn search_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.content,
            self.category,
            self.tags.join(" ")
        )
    }
}

impl Searchable for TimeLog {
    fn search_text(&self) -> String {
        format!("{} {}", self.description, self.project.as_deref().unwrap_or_default())
    }
}

/// Sum of the lengths (in characters) of the query words found in `text`.
#[must_use]
pub fn relevance(query: &str, text: &str) -> usize {
    let text = text.to_lowercase();
    query
        .to_lowercase()
        .split(' ')
        .filter(|word| text.contains(word))
        .map(|word| word.chars().count())
        .sum()
}

/// Score `items`, drop zero scores, and keep the `limit` best.
///
/// The sort is stable, so equal scores keep their input order.
#[must_use]
pub fn rank_by_relevance<T: Searchable>(
    query: &str,
    items: Vec<T>,
    limit: usize,
) -> Vec<(usize, T)> {
    let mut scored: Vec<(usize, T)> = items
        .into_iter()
        .map(|item| (relevance(query, &item.search_text()), item))
        .filter(|(score, _)| *score > 0)
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);
    scored
}

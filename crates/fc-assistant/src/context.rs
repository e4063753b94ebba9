//! Context assembly: which team records go into a reply.
//!
//! The keyword strategy filters the collection an intent points at by a
//! case-insensitive substring match of the raw query. It is literal character
//! matching, not search: "Vis mig alle åbne bugs" only hits a bug whose title
//! or description contains that whole sentence. When the filter finds
//! nothing, the most recent records are used instead and the bundle is
//! flagged as unmatched.
//!
//! The relevance strategy scores every record of all four collections with
//! [`relevance`](crate::relevance::relevance) and keeps the best ten overall.

use std::sync::Arc;

use fc_config::ContextStrategy;
use fc_core::entities::{Bug, FeatureRequest, KnowledgeCase, TimeLog};
use fc_core::enums::Intent;
use fc_db::error::DatabaseError;
use fc_db::store::DataStore;
use tracing::{debug, warn};

use crate::relevance::{Searchable, rank_by_relevance};

/// Cap on filtered bugs.
pub const BUG_LIMIT: usize = 10;
/// Cap on filtered feature requests.
pub const FEATURE_LIMIT: usize = 10;
/// Cap on filtered knowledge cases.
pub const KNOWLEDGE_LIMIT: usize = 10;
/// Cap on filtered time logs.
pub const TIME_LOG_LIMIT: usize = 20;
/// Records kept across all collections by the relevance strategy.
pub const RELEVANCE_LIMIT: usize = 10;

/// Unfiltered bug sample for the general and team intents.
pub const SAMPLE_BUGS: u32 = 5;
/// Unfiltered feature-request sample for the general and team intents.
pub const SAMPLE_FEATURES: u32 = 5;
/// Unfiltered knowledge-case sample for the general and team intents.
pub const SAMPLE_KNOWLEDGE: u32 = 5;
/// Unfiltered time-log sample for the general and team intents.
pub const SAMPLE_TIME_LOGS: u32 = 10;

// ── Types ──────────────────────────────────────────────────────────

/// The records assembled for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextBundle {
    pub intent: Intent,
    /// `false` when the query matched nothing and recent records were used.
    pub matched: bool,
    pub bugs: Vec<Bug>,
    pub features: Vec<FeatureRequest>,
    pub knowledge: Vec<KnowledgeCase>,
    pub time_logs: Vec<TimeLog>,
}

impl ContextBundle {
    #[must_use]
    pub const fn empty(intent: Intent) -> Self {
        Self {
            intent,
            matched: true,
            bugs: Vec::new(),
            features: Vec::new(),
            knowledge: Vec::new(),
            time_logs: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of records across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bugs.len() + self.features.len() + self.knowledge.len() + self.time_logs.len()
    }

    /// Sum of `hours` over the bundled time logs.
    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.time_logs.iter().map(|log| log.hours).sum()
    }
}

// ── Assembler ──────────────────────────────────────────────────────

/// Reads team records through a [`DataStore`] and builds [`ContextBundle`]s.
pub struct ContextAssembler {
    store: Arc<dyn DataStore>,
    strategy: ContextStrategy,
}

impl ContextAssembler {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, strategy: ContextStrategy) -> Self {
        Self { store, strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> ContextStrategy {
        self.strategy
    }

    /// Assemble the context for `query` in `team_id`.
    ///
    /// Never fails: a collection that cannot be fetched is logged and
    /// treated as empty.
    pub async fn assemble(&self, query: &str, intent: Intent, team_id: &str) -> ContextBundle {
        let bundle = match self.strategy {
            ContextStrategy::Keyword => self.assemble_keyword(query, intent, team_id).await,
            ContextStrategy::Relevance => self.assemble_relevance(query, intent, team_id).await,
        };
        debug!(
            %intent,
            strategy = ?self.strategy,
            matched = bundle.matched,
            bugs = bundle.bugs.len(),
            features = bundle.features.len(),
            knowledge = bundle.knowledge.len(),
            time_logs = bundle.time_logs.len(),
            "assembled context"
        );
        bundle
    }

    async fn assemble_keyword(
        &self,
        query: &str,
        intent: Intent,
        team_id: &str,
    ) -> ContextBundle {
        let mut bundle = ContextBundle::empty(intent);
        match intent {
            Intent::Bugs => {
                let bugs = or_empty(self.store.list_bugs(team_id, None).await, "bugs");
                (bundle.bugs, bundle.matched) = filter_or_recent(query, bugs, BUG_LIMIT);
            }
            Intent::Features => {
                let features =
                    or_empty(self.store.list_features(team_id, None).await, "features");
                (bundle.features, bundle.matched) =
                    filter_or_recent(query, features, FEATURE_LIMIT);
            }
            Intent::Knowledge => {
                let cases =
                    or_empty(self.store.list_knowledge(team_id, None).await, "knowledge");
                (bundle.knowledge, bundle.matched) =
                    filter_or_recent(query, cases, KNOWLEDGE_LIMIT);
            }
            Intent::Time => {
                let logs =
                    or_empty(self.store.list_time_logs(team_id, None).await, "time_logs");
                (bundle.time_logs, bundle.matched) =
                    filter_or_recent(query, logs, TIME_LOG_LIMIT);
            }
            Intent::Team | Intent::General => {
                let (bugs, features, knowledge, time_logs) = tokio::join!(
                    self.store.list_bugs(team_id, Some(SAMPLE_BUGS)),
                    self.store.list_features(team_id, Some(SAMPLE_FEATURES)),
                    self.store.list_knowledge(team_id, Some(SAMPLE_KNOWLEDGE)),
                    self.store.list_time_logs(team_id, Some(SAMPLE_TIME_LOGS)),
                );
                bundle.bugs = or_empty(bugs, "bugs");
                bundle.features = or_empty(features, "features");
                bundle.knowledge = or_empty(knowledge, "knowledge");
                bundle.time_logs = or_empty(time_logs, "time_logs");
            }
        }
        bundle
    }

    async fn assemble_relevance(
        &self,
        query: &str,
        intent: Intent,
        team_id: &str,
    ) -> ContextBundle {
        let (bugs, features, knowledge, time_logs) = tokio::join!(
            self.store.list_bugs(team_id, None),
            self.store.list_features(team_id, None),
            self.store.list_knowledge(team_id, None),
            self.store.list_time_logs(team_id, None),
        );

        let candidates: Vec<Candidate> = or_empty(bugs, "bugs")
            .into_iter()
            .map(Candidate::Bug)
            .chain(
                or_empty(features, "features")
                    .into_iter()
                    .map(Candidate::Feature),
            )
            .chain(
                or_empty(knowledge, "knowledge")
                    .into_iter()
                    .map(Candidate::Knowledge),
            )
            .chain(
                or_empty(time_logs, "time_logs")
                    .into_iter()
                    .map(Candidate::TimeLog),
            )
            .collect();

        let mut bundle = ContextBundle::empty(intent);
        for (_, candidate) in rank_by_relevance(query, candidates, RELEVANCE_LIMIT) {
            match candidate {
                Candidate::Bug(bug) => bundle.bugs.push(bug),
                Candidate::Feature(feature) => bundle.features.push(feature),
                Candidate::Knowledge(case) => bundle.knowledge.push(case),
                Candidate::TimeLog(log) => bundle.time_logs.push(log),
            }
        }
        bundle
    }
}

/// One record from any collection, scored together by the relevance strategy.
enum Candidate {
    Bug(Bug),
    Feature(FeatureRequest),
    Knowledge(KnowledgeCase),
    TimeLog(TimeLog),
}

impl Searchable for Candidate {
    fn search_text(&self) -> String {
        match self {
            Self::Bug(bug) => bug.search_text(),
            Self::Feature(feature) => feature.search_text(),
            Self::Knowledge(case) => case.search_text(),
            Self::TimeLog(log) => log.search_text(),
        }
    }
}

// ── Helpers ────────────────────────────────────────────────────────

fn or_empty<T>(result: Result<Vec<T>, DatabaseError>, collection: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(collection, %e, "context fetch failed, using empty collection");
        Vec::new()
    })
}

/// Items whose search text contains `query` (case-insensitive), capped at
/// `limit` in storage order. Falls back to the first `limit` items with
/// `matched = false` when none contain it.
fn filter_or_recent<T: Searchable>(query: &str, items: Vec<T>, limit: usize) -> (Vec<T>, bool) {
    let needle = query.to_lowercase();
    let (mut hits, rest): (Vec<T>, Vec<T>) = items
        .into_iter()
        .partition(|item| item.search_text().to_lowercase().contains(&needle));

    if hits.is_empty() {
        let mut recent = rest;
        recent.truncate(limit);
        let matched = recent.is_empty();
        return (recent, matched);
    }
    hits.truncate(limit);
    (hits, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Doc(&'static str);

    impl Searchable for Doc {
        fn search_text(&self) -> String {
            self.0.to_string()
        }
    }

    fn texts(docs: &[Doc]) -> Vec<&'static str> {
        docs.iter().map(|d| d.0).collect()
    }

    #[test]
    fn filter_keeps_storage_order() {
        let docs = vec![Doc("Login FEJL"), Doc("andet"), Doc("fejl i login igen")];
        let (hits, matched) = filter_or_recent("login", docs, 10);
        assert!(matched);
        assert_eq!(texts(&hits), vec!["Login FEJL", "fejl i login igen"]);
    }

    #[test]
    fn filter_caps_hits() {
        let docs: Vec<Doc> = (0..15).map(|_| Doc("api")).collect();
        let (hits, _) = filter_or_recent("api", docs, BUG_LIMIT);
        assert_eq!(hits.len(), BUG_LIMIT);
    }

    #[test]
    fn no_hit_falls_back_to_recent() {
        let docs = vec![Doc("a"), Doc("b"), Doc("c")];
        let (recent, matched) = filter_or_recent("hvor mange timer", docs, 2);
        assert!(!matched);
        assert_eq!(texts(&recent), vec!["a", "b"]);
    }

    #[test]
    fn empty_collection_stays_empty_and_matched() {
        let (recent, matched) = filter_or_recent::<Doc>("noget", Vec::new(), 10);
        assert!(recent.is_empty());
        assert!(matched);
    }

    #[test]
    fn empty_bundle() {
        let bundle = ContextBundle::empty(Intent::Knowledge);
        assert!(bundle.is_empty());
        assert_eq!(bundle.len(), 0);
        assert!(bundle.total_hours().abs() < f64::EPSILON);
    }
}

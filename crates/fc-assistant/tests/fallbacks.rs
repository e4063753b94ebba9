//! Failure handling with fake stores: failed fetches, failed appends, and
//! a store that panics mid-reply.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use fc_assistant::conversation::ConversationLog;
use fc_assistant::templates::{APOLOGY, FixedSource};
use fc_assistant::{Assistant, ReplySource, ResponseGenerator};
use fc_config::ContextStrategy;
use fc_core::entities::{
    Bug, ConversationTurn, FeatureRequest, KnowledgeCase, NewConversationTurn, TimeLog,
};
use fc_core::enums::{ConversationRole, Intent};
use fc_db::error::DatabaseError;
use fc_db::store::DataStore;

/// How the fake store behaves on reads.
#[derive(Clone, Copy)]
enum Reads {
    /// Bugs fail, every other collection is empty.
    FailBugs,
    /// Every read fails.
    FailAll,
    /// Listing bugs panics.
    PanicOnBugs,
}

struct FakeStore {
    reads: Reads,
    fail_appends: bool,
    appended: Mutex<Vec<NewConversationTurn>>,
}

impl FakeStore {
    fn new(reads: Reads) -> Self {
        Self {
            reads,
            fail_appends: false,
            appended: Mutex::new(Vec::new()),
        }
    }

    fn appended(&self) -> Vec<NewConversationTurn> {
        self.appended.lock().unwrap().clone()
    }

    fn read<T>(&self, items: Vec<T>) -> Result<Vec<T>, DatabaseError> {
        match self.reads {
            Reads::FailAll => Err(DatabaseError::Query("backend unavailable".into())),
            _ => Ok(items),
        }
    }
}

#[async_trait]
impl DataStore for FakeStore {
    async fn list_bugs(
        &self,
        _team_id: &str,
        _limit: Option<u32>,
    ) -> Result<Vec<Bug>, DatabaseError> {
        match self.reads {
            Reads::PanicOnBugs => panic!("bug table exploded"),
            Reads::FailBugs | Reads::FailAll => {
                Err(DatabaseError::Query("bugs unavailable".into()))
            }
        }
    }

    async fn list_features(
        &self,
        _team_id: &str,
        _limit: Option<u32>,
    ) -> Result<Vec<FeatureRequest>, DatabaseError> {
        self.read(Vec::new())
    }

    async fn list_knowledge(
        &self,
        _team_id: &str,
        _limit: Option<u32>,
    ) -> Result<Vec<KnowledgeCase>, DatabaseError> {
        self.read(Vec::new())
    }

    async fn list_time_logs(
        &self,
        _team_id: &str,
        _limit: Option<u32>,
    ) -> Result<Vec<TimeLog>, DatabaseError> {
        self.read(Vec::new())
    }

    async fn append_conversation_turn(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, DatabaseError> {
        if self.fail_appends {
            return Err(DatabaseError::Query("insert rejected".into()));
        }
        let mut appended = self.appended.lock().unwrap();
        appended.push(turn.clone());
        Ok(ConversationTurn {
            id: format!("msg-{:08x}", appended.len()),
            content: turn.content.clone(),
            role: turn.role,
            team_id: turn.team_id.clone(),
            user_id: turn.user_id.clone(),
            created_at: turn.created_at,
        })
    }

    async fn load_conversation_history(
        &self,
        _team_id: &str,
        _limit: u32,
    ) -> Result<Vec<ConversationTurn>, DatabaseError> {
        Err(DatabaseError::Query("history unavailable".into()))
    }
}

fn assistant(store: Arc<FakeStore>) -> Assistant {
    let generator = ResponseGenerator::new(None, Arc::new(FixedSource(0)));
    Assistant::from_parts(store, generator, ContextStrategy::Keyword, 50)
}

#[tokio::test]
async fn failed_fetch_is_an_empty_collection() {
    let store = Arc::new(FakeStore::new(Reads::FailBugs));
    let reply = assistant(Arc::clone(&store))
        .ask("team-a", "user-1", "Der er en fejl i login")
        .await;

    assert_eq!(reply.intent, Intent::Bugs);
    assert_eq!(reply.source, ReplySource::Template);
    assert_eq!(reply.context_size, 0);
    assert!(reply.content.contains("bug-rapport"), "{}", reply.content);
    assert_eq!(store.appended().len(), 2);
}

#[tokio::test]
async fn every_fetch_failing_still_answers() {
    let store = Arc::new(FakeStore::new(Reads::FailAll));
    let reply = assistant(store).ask("team-a", "user-1", "Hej").await;

    assert_eq!(reply.intent, Intent::General);
    assert_eq!(reply.source, ReplySource::Template);
    assert!(reply.content.contains("ingen data"), "{}", reply.content);
}

#[tokio::test]
async fn panic_during_reply_becomes_apology_and_user_turn_is_kept() {
    let store = Arc::new(FakeStore::new(Reads::PanicOnBugs));
    let reply = assistant(Arc::clone(&store))
        .ask("team-a", "user-1", "Vis bugs")
        .await;

    assert_eq!(reply.source, ReplySource::Apology);
    assert_eq!(reply.content, APOLOGY);

    let appended = store.appended();
    assert_eq!(appended.len(), 2);
    assert_eq!(appended[0].role, ConversationRole::User);
    assert_eq!(appended[0].content, "Vis bugs");
    assert_eq!(appended[1].role, ConversationRole::Assistant);
    assert_eq!(appended[1].content, APOLOGY);
}

#[tokio::test]
async fn failed_append_does_not_affect_reply() {
    let store = Arc::new(FakeStore {
        fail_appends: true,
        ..FakeStore::new(Reads::FailBugs)
    });
    let reply = assistant(Arc::clone(&store))
        .ask("team-a", "user-1", "Hvor mange timer?")
        .await;

    assert_eq!(reply.intent, Intent::Time);
    assert_eq!(reply.source, ReplySource::Template);
    assert!(!reply.content.is_empty());
    assert!(store.appended().is_empty());
}

#[tokio::test]
async fn history_read_failure_is_an_error() {
    let store = Arc::new(FakeStore::new(Reads::FailBugs));
    let err = assistant(store).history("team-a", None).await.unwrap_err();
    assert!(err.to_string().contains("history unavailable"));
}

#[tokio::test]
async fn conversation_log_reports_append_outcome() {
    let ok = ConversationLog::new(Arc::new(FakeStore::new(Reads::FailBugs)));
    let stored = ok
        .append(NewConversationTurn::assistant("team-a", "Svar"))
        .await
        .unwrap();
    assert_eq!(stored.role, ConversationRole::Assistant);

    let failing = ConversationLog::new(Arc::new(FakeStore {
        fail_appends: true,
        ..FakeStore::new(Reads::FailBugs)
    }));
    let handle = failing.spawn_append(NewConversationTurn::user("team-a", "user-1", "Hej"));
    assert!(handle.await.unwrap().is_none());
}

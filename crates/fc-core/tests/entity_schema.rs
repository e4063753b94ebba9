//! JsonSchema validation tests for the entities exchanged with the backend.

use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use schemars::schema_for;
use fc_core::entities::*;
use fc_core::enums::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! validate_schema {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

validate_schema!(
    bug_schema,
    Bug,
    Bug {
        id: "bug-a3f8b2c1".into(),
        title: "Login fejler på Safari".into(),
        description: None,
        status: BugStatus::InProgress,
        priority: BugPriority::Critical,
        assigned_to: Some("user-2".into()),
        team_id: "team-1".into(),
        created_by: "user-1".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

validate_schema!(
    knowledge_schema,
    KnowledgeCase,
    KnowledgeCase {
        id: "kno-00c0ffee".into(),
        title: "Deploy guide".into(),
        content: "## Trin\n1. Merge til main".into(),
        category: "drift".into(),
        tags: vec!["deploy".into(), "ci".into()],
        team_id: "team-1".into(),
        created_by: "user-1".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

validate_schema!(
    time_log_schema,
    TimeLog,
    TimeLog {
        id: "tim-12345678".into(),
        description: "Kodegennemgang".into(),
        hours: 2.5,
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        project: None,
        team_id: "team-1".into(),
        user_id: "user-1".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

#[test]
fn assistant_turn_has_no_user() {
    let turn = NewConversationTurn::assistant("team-1", "Hej!");
    assert_eq!(turn.role, ConversationRole::Assistant);
    assert_eq!(turn.user_id, None);

    let turn = NewConversationTurn::user("team-1", "user-1", "Hvor er bugs?");
    assert_eq!(turn.role, ConversationRole::User);
    assert_eq!(turn.user_id.as_deref(), Some("user-1"));
}

#[test]
fn stored_system_role_deserializes() {
    let json = serde_json::json!({
        "id": "msg-deadbeef",
        "content": "Hej",
        "role": "system",
        "team_id": "team-1",
        "user_id": null,
        "created_at": "2026-03-14T09:00:00Z"
    });
    let turn: ConversationTurn = serde_json::from_value(json).unwrap();
    assert_eq!(turn.role, ConversationRole::Assistant);
}

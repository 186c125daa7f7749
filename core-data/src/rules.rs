//! Write rules: cross-entity side effects hosted by the table gateway.
//!
//! A rule watches inserts into one collection and, when its predicate
//! matches, performs additional document writes before the primary write.
//! Every step is best-effort: a rule reports per-step outcomes and never
//! fails the triggering insert. There is no transaction spanning the steps;
//! a crash mid-rule leaves partial state.

use async_trait::async_trait;
use bridge_traits::document::{Document, DocumentStore};
use chrono::Utc;
use core_runtime::envelope::ErrorInfo;
use core_runtime::events::{CoreEvent, DataEvent, EventBus};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

/// Collection receiving evidence-bearing posts.
pub const POSTS_COLLECTION: &str = "posts";
/// Collection receiving award records.
pub const MEDALS_COLLECTION: &str = "medals";
/// Collection holding per-user documents with the `medals` array.
pub const USERS_COLLECTION: &str = "users";

/// Payload flag marking an insert as challenge evidence.
const EVIDENCE_FLAG_FIELD: &str = "isChallengeEvidence";
/// Payload field carrying the acting user's id.
const ACTOR_FIELD: &str = "uid";
/// Payload field carrying the challenge the evidence belongs to.
const CHALLENGE_FIELD: &str = "challenge_id";
/// Array field on the user document receiving award entries.
const USER_MEDALS_FIELD: &str = "medals";

/// Outcome of one side-effect step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideEffectOutcome {
    /// Name of the rule that ran the step.
    pub rule: String,
    /// The step label (e.g. `award-insert`).
    pub action: String,
    /// The failure, when the step did not complete.
    pub error: Option<ErrorInfo>,
}

impl SideEffectOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    fn ok(rule: &str, action: &str) -> Self {
        Self {
            rule: rule.to_string(),
            action: action.to_string(),
            error: None,
        }
    }

    fn failed(rule: &str, action: &str, error: impl Into<ErrorInfo>) -> Self {
        Self {
            rule: rule.to_string(),
            action: action.to_string(),
            error: Some(error.into()),
        }
    }
}

/// A side-effect rule evaluated on every insert.
#[async_trait]
pub trait WriteRule: Send + Sync {
    /// Stable rule name, used in outcomes, logs, and events.
    fn name(&self) -> &str;

    /// Whether this rule fires for an insert of `fields` into `collection`.
    fn applies(&self, collection: &str, fields: &Document) -> bool;

    /// Run the rule's writes against `store`, reporting one outcome per
    /// step. Implementations catch their own errors; `run` itself never
    /// fails the triggering insert.
    async fn run(&self, store: &dyn DocumentStore, fields: &Document) -> Vec<SideEffectOutcome>;
}

/// Award bookkeeping for challenge-evidence posts.
///
/// Fires on inserts into the posts collection whose payload carries
/// `isChallengeEvidence: true`, and performs two writes keyed by the
/// payload's `uid`:
///
/// 1. a new award record in the medals collection, and
/// 2. an append of an award entry onto the user document's `medals` array.
///
/// The append uses the store's array-append primitive, which is
/// read-modify-write unless the backend overrides it: two concurrent
/// evidence inserts for the same actor can lose one entry. Nothing links
/// the award back to the post beyond the copied challenge id.
pub struct ChallengeAwardRule {
    posts_collection: String,
    medals_collection: String,
    users_collection: String,
    event_bus: EventBus,
}

impl ChallengeAwardRule {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            posts_collection: POSTS_COLLECTION.to_string(),
            medals_collection: MEDALS_COLLECTION.to_string(),
            users_collection: USERS_COLLECTION.to_string(),
            event_bus,
        }
    }

    /// Override the collections the rule reads and writes, for callers whose
    /// schema uses different names.
    pub fn with_collections(
        mut self,
        posts: impl Into<String>,
        medals: impl Into<String>,
        users: impl Into<String>,
    ) -> Self {
        self.posts_collection = posts.into();
        self.medals_collection = medals.into();
        self.users_collection = users.into();
        self
    }
}

#[async_trait]
impl WriteRule for ChallengeAwardRule {
    fn name(&self) -> &str {
        "challenge-award"
    }

    fn applies(&self, collection: &str, fields: &Document) -> bool {
        collection == self.posts_collection
            && fields
                .get(EVIDENCE_FLAG_FIELD)
                .and_then(Value::as_bool)
                .unwrap_or(false)
    }

    async fn run(&self, store: &dyn DocumentStore, fields: &Document) -> Vec<SideEffectOutcome> {
        let Some(actor) = fields.get(ACTOR_FIELD).and_then(Value::as_str) else {
            return vec![SideEffectOutcome::failed(
                self.name(),
                "award-insert",
                ErrorInfo::contract("evidence post carries no uid"),
            )];
        };
        let challenge_id = fields
            .get(CHALLENGE_FIELD)
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut outcomes = Vec::with_capacity(2);

        let mut medal = Document::new();
        medal.insert(ACTOR_FIELD.to_string(), json!(actor));
        medal.insert("challengeId".to_string(), json!(challenge_id));
        medal.insert("type".to_string(), json!("challenge"));

        let outcome = match store.insert(&self.medals_collection, medal).await {
            Ok(_) => SideEffectOutcome::ok(self.name(), "award-insert"),
            Err(err) => SideEffectOutcome::failed(self.name(), "award-insert", err),
        };
        outcomes.push(outcome);

        let entry = json!({ "challengeId": challenge_id, "date": Utc::now() });
        let outcome = match store
            .append_to_array(&self.users_collection, actor, USER_MEDALS_FIELD, entry)
            .await
        {
            Ok(()) => SideEffectOutcome::ok(self.name(), "user-array-append"),
            Err(err) => SideEffectOutcome::failed(self.name(), "user-array-append", err),
        };
        outcomes.push(outcome);

        if outcomes.iter().all(SideEffectOutcome::succeeded) {
            debug!(actor, challenge_id = ?challenge_id, "Award granted");
            let _ = self.event_bus.emit(CoreEvent::Data(DataEvent::AwardGranted {
                user_id: actor.to_string(),
                challenge_id,
            }));
        }

        outcomes
    }
}

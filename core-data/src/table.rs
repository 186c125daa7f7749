//! # Table Handle
//!
//! Per-collection gateway translating the fluent table contract onto the
//! document store.
//!
//! ## Semantics
//!
//! - `insert` honors a single record (the first element of an array form),
//!   stamps nothing itself — the store assigns `id` and `createdAt` — and
//!   runs the hosted write rules before the primary write.
//! - `select` is a fixed page: up to 50 rows, newest first. No cursor, no
//!   filters, no order override.
//! - `update` targets one document by id; the compat form resolves the id
//!   heuristically from the payload, `update_by_id` takes it explicitly.
//! - `delete` accepts exactly one shape: an array whose first element
//!   carries an explicit id.
//!
//! Every method settles to an [`Envelope`]; store failures are captured,
//! never thrown.

use crate::error::DataError;
use crate::rules::WriteRule;
use crate::types::{first_record, value_to_id, InsertReport, Row};
use bridge_traits::document::{Document, DocumentStore};
use core_runtime::envelope::Envelope;
use core_runtime::events::{CoreEvent, DataEvent, EventBus};
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Fixed page size of [`TableHandle::select`].
pub const SELECT_LIMIT: usize = 50;

/// Reserved fields stripped from write payloads: assigned by the store,
/// never writable by callers.
const RESERVED_FIELDS: [&str; 2] = ["id", "createdAt"];

/// Update-target resolution order of the compat [`TableHandle::update`].
///
/// First match wins. The heuristic exists for callers that put the document
/// id under a foreign-key-ish name; prefer [`TableHandle::update_by_id`]
/// in new code.
const UPDATE_ID_FIELDS: [&str; 3] = ["id", "uid", "user_id"];

/// Per-collection table gateway.
///
/// Cheap to construct; the service facade mints one per `from(name)` call
/// over shared `Arc`'d dependencies.
#[derive(Clone)]
pub struct TableHandle {
    collection: String,
    store: Arc<dyn DocumentStore>,
    rules: Arc<[Arc<dyn WriteRule>]>,
    event_bus: EventBus,
}

impl TableHandle {
    pub fn new(
        collection: impl Into<String>,
        store: Arc<dyn DocumentStore>,
        rules: Arc<[Arc<dyn WriteRule>]>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            collection: collection.into(),
            store,
            rules,
            event_bus,
        }
    }

    /// The collection this handle writes to.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Insert one record and settle to `[row]`.
    ///
    /// Array payloads are narrowed to their first element. Matching write
    /// rules run first; their failures are logged and swallowed — this is
    /// the compatibility surface. Use [`insert_reported`](Self::insert_reported)
    /// to observe side-effect outcomes.
    #[instrument(skip(self, payload), fields(collection = %self.collection))]
    pub async fn insert(&self, payload: Value) -> Envelope<Vec<Row>> {
        match self.insert_inner(payload).await {
            Ok(report) => Envelope::ok(report.rows),
            Err(err) => Envelope::err(err),
        }
    }

    /// Insert one record and settle to the full [`InsertReport`], including
    /// one outcome per side-effect step.
    ///
    /// The primary-write semantics are identical to [`insert`](Self::insert);
    /// only the settle shape differs.
    #[instrument(skip(self, payload), fields(collection = %self.collection))]
    pub async fn insert_reported(&self, payload: Value) -> Envelope<InsertReport> {
        match self.insert_inner(payload).await {
            Ok(report) => Envelope::ok(report),
            Err(err) => Envelope::err(err),
        }
    }

    async fn insert_inner(&self, payload: Value) -> Result<InsertReport, DataError> {
        let mut fields = first_record(&payload)?;
        strip_reserved(&mut fields);

        // Side effects run before the primary write, as the callers expect;
        // there is no rollback in either direction.
        let mut side_effects = Vec::new();
        for rule in self.rules.iter() {
            if !rule.applies(&self.collection, &fields) {
                continue;
            }

            let outcomes = rule.run(self.store.as_ref(), &fields).await;
            for outcome in &outcomes {
                if let Some(error) = &outcome.error {
                    warn!(
                        rule = %outcome.rule,
                        action = %outcome.action,
                        error = %error,
                        "Side-effect step failed; primary insert proceeds"
                    );
                    let _ = self
                        .event_bus
                        .emit(CoreEvent::Data(DataEvent::SideEffectFailed {
                            rule: outcome.rule.clone(),
                            action: outcome.action.clone(),
                            message: error.message.clone(),
                        }));
                }
            }
            side_effects.extend(outcomes);
        }

        let stored = self.store.insert(&self.collection, fields).await?;
        let _ = self.event_bus.emit(CoreEvent::Data(DataEvent::RowInserted {
            collection: self.collection.clone(),
            id: stored.id.clone(),
        }));

        Ok(InsertReport {
            rows: vec![stored],
            side_effects,
        })
    }

    /// Settle to the newest rows of the collection: at most
    /// [`SELECT_LIMIT`], ordered by `createdAt` descending.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn select(&self) -> Envelope<Vec<Row>> {
        self.store
            .list_recent(&self.collection, SELECT_LIMIT)
            .await
            .into()
    }

    /// Overwrite one record, resolving the target id from the payload.
    ///
    /// The id is taken from the first element's `id`, `uid`, or `user_id`
    /// field, first match wins; settles to an `id required` error when none
    /// is present, without touching the store.
    #[instrument(skip(self, payload), fields(collection = %self.collection))]
    pub async fn update(&self, payload: Value) -> Envelope<Vec<Row>> {
        let fields = match first_record(&payload) {
            Ok(fields) => fields,
            Err(err) => return Envelope::err(err),
        };

        let id = UPDATE_ID_FIELDS
            .iter()
            .find_map(|key| fields.get(*key).and_then(value_to_id));
        match id {
            Some(id) => self.write_over(&id, fields).await,
            None => Envelope::err(DataError::IdRequired),
        }
    }

    /// Overwrite the record at `id` with the payload's fields.
    ///
    /// The explicit-target form of [`update`](Self::update); settles to the
    /// post-update record read back from the store.
    #[instrument(skip(self, payload), fields(collection = %self.collection, id = %id))]
    pub async fn update_by_id(&self, id: &str, payload: Value) -> Envelope<Vec<Row>> {
        let fields = match first_record(&payload) {
            Ok(fields) => fields,
            Err(err) => return Envelope::err(err),
        };
        self.write_over(id, fields).await
    }

    async fn write_over(&self, id: &str, mut fields: Document) -> Envelope<Vec<Row>> {
        strip_reserved(&mut fields);

        if let Err(err) = self.store.update(&self.collection, id, fields).await {
            return Envelope::err(DataError::from(err));
        }

        let _ = self.event_bus.emit(CoreEvent::Data(DataEvent::RowUpdated {
            collection: self.collection.clone(),
            id: id.to_string(),
        }));

        // Read back the post-update record
        match self.store.get(&self.collection, id).await {
            Ok(Some(row)) => Envelope::ok(vec![row]),
            Ok(None) => Envelope::err(DataError::Store(
                bridge_traits::BridgeError::DocumentNotFound {
                    collection: self.collection.clone(),
                    id: id.to_string(),
                },
            )),
            Err(err) => Envelope::err(DataError::from(err)),
        }
    }

    /// Delete one record.
    ///
    /// Supports exactly one filter shape: an array whose first element
    /// carries an explicit `id`. Anything else settles to an
    /// `unsupported delete` error without touching the store.
    #[instrument(skip(self, filter), fields(collection = %self.collection))]
    pub async fn delete(&self, filter: Value) -> Envelope<()> {
        let id = filter
            .as_array()
            .and_then(|items| items.first())
            .and_then(|first| first.get("id"))
            .and_then(value_to_id);

        let Some(id) = id else {
            return Envelope::err(DataError::UnsupportedDelete);
        };

        match self.store.delete(&self.collection, &id).await {
            Ok(()) => {
                let _ = self.event_bus.emit(CoreEvent::Data(DataEvent::RowDeleted {
                    collection: self.collection.clone(),
                    id,
                }));
                Envelope::ok(())
            }
            Err(err) => Envelope::err(DataError::from(err)),
        }
    }
}

fn strip_reserved(fields: &mut Document) {
    for reserved in RESERVED_FIELDS {
        fields.remove(reserved);
    }
}

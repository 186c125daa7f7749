//! # Table Gateway Module
//!
//! Relational-feeling table surface over the document store.
//!
//! ## Overview
//!
//! This module exposes the [`TableHandle`]: per-collection insert / select /
//! update / delete with the fixed semantics the application is written
//! against — recency-ordered 50-row pages, id-targeted writes, and a
//! deliberately narrow delete shape. It also hosts the write rules that fan
//! a matching insert out into best-effort side-effect writes (the challenge
//! award bookkeeping).
//!
//! ## Consistency
//!
//! There is no cross-document atomicity anywhere in this layer. Side-effect
//! writes run before the primary write and are swallowed on failure; a crash
//! between steps leaves partial state. The compat surface
//! ([`TableHandle::insert`]) reports success regardless of side-effect
//! outcomes, while [`TableHandle::insert_reported`] surfaces them
//! structurally.

pub mod error;
pub mod rules;
pub mod table;
pub mod types;

pub use error::{DataError, Result};
pub use rules::{ChallengeAwardRule, SideEffectOutcome, WriteRule};
pub use table::{TableHandle, SELECT_LIMIT};
pub use types::{InsertReport, Row};

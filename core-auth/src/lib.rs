//! # Authentication Module
//!
//! Identity bridge between the application's auth surface and the external
//! identity provider.
//!
//! ## Overview
//!
//! This module exposes the [`AuthGateway`]: sign-up, password and federated
//! sign-in, password reset, profile metadata updates, and locally cached
//! session reads. Every operation settles to the shared result envelope;
//! identity transitions notify registered watchers and are mirrored onto the
//! runtime event bus.
//!
//! ## Features
//!
//! - Email/password and federated sign-in through a pluggable backend
//! - Adapter-local session cache (the provider is never asked for freshness)
//! - State-change watchers with explicit unsubscribe handles
//! - Fire-and-forget register-user collaborator notification after sign-up

pub mod error;
pub mod gateway;
pub mod registration;
pub mod types;

pub use error::{AuthError, Result};
pub use gateway::{AuthGateway, AuthSubscription};
pub use registration::{NewUserRegistration, RegistrationClient};
pub use types::{
    AuthChangeKind, AuthPayload, Credentials, ProfileSeed, Session, SessionPayload, SignUpParams,
    UpdateUserParams, UserPayload, UserRecord,
};

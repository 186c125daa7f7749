//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the data-access core:
//! - The [`Envelope`](envelope::Envelope) result contract every gateway
//!   method settles to
//! - Logging and tracing infrastructure
//! - Configuration management (backend injection, fail-fast validation)
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the gateway crates depend on.
//! It establishes the result-envelope convention, logging conventions, and
//! event broadcasting mechanisms used throughout the system.

pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder};
pub use envelope::{Envelope, ErrorCode, ErrorInfo};
pub use error::{Error, Result};

//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the
//! individual workspace crates (e.g., `core-service`, `bridge-memory`,
//! `bridge-desktop`). Host applications can depend on `fsc-workspace` and
//! enable the documented features without needing to wire each crate
//! individually.

#[cfg(feature = "service")]
pub use core_service;

#[cfg(feature = "memory-backends")]
pub use bridge_memory;

#[cfg(feature = "desktop-http")]
pub use bridge_desktop;

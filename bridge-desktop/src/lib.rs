//! # Desktop Bridge Implementations
//!
//! Native host adapters for the bridge traits. Currently this covers the
//! HTTP client used to reach the external collaborator endpoints; the three
//! data backends are vendor services injected by the embedding application.

pub mod http;

pub use http::ReqwestHttpClient;

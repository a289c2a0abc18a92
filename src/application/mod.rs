//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates when a label is rendered:
//! - Binding (subscription lifecycle, gating, forced renders, teardown)
//! - Signal (the merged render trigger)
//! - Subscription handles
//! - Metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod binding;
pub mod metrics;
pub mod ports;
pub mod signal;
pub mod subscription;

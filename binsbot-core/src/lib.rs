//! Core types and service wiring for looking up household bin collections.

/// Domain models shared by all backends.
pub mod model;
/// Decoding of upstream schedule payloads.
pub mod normalize;
/// Traits describing the backend interface.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;

pub use model::*;
pub use normalize::*;
pub use ports::*;
pub use service::*;

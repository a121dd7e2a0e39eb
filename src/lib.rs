//! Core library surface for the Booking Entry Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the in-memory store with its validation rules, the domain models,
//! and the interactive front-end.
pub mod models;
pub mod store;
pub mod ui;

/// The domain types that every layer manipulates.
pub use models::{BookingCandidate, BookingEntry};

/// Convenience re-exports for the store layer: the authoritative booking list
/// plus the error taxonomy its `add` operation reports.
pub use store::{BookingStore, SubscriberId, ValidationError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

//! Shared data structures for the killer catalog.
//!
//! `Killer` is the stored row, `KillerPayload` is what clients send and
//! `KillerFields` is the validated form the repository accepts.

pub mod error;
pub mod killer;

// Re-export the core types to provide a clean public API.
pub use error::ValidationError;
pub use killer::{Killer, KillerFields, KillerPayload, RELEASE_DATE_FORMAT};

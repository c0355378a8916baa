//! # Killer Catalog Database Crate
//!
//! This crate is the application-specific interface to the PostgreSQL
//! `killers` table.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All SQL lives here. The route layer only sees the
//!   `KillerStore` trait, so the backend can be swapped (PostgreSQL in
//!   production, `InMemoryRepository` in development and tests).
//! - **Bound parameters only:** Every value that originates from a request is
//!   passed through a `$n` placeholder, never formatted into SQL text.
//! - **Asynchronous & Pooled:** All operations are asynchronous and share one
//!   `PgPool`, constructed by the process entry point and injected here.
//!
//! ## Public API
//!
//! - `connect`: builds the connection pool from `DatabaseSettings`.
//! - `KillerStore`: the list/get/create/update/delete contract.
//! - `DbRepository`: the PostgreSQL implementation.
//! - `InMemoryRepository`: a lock-protected map implementation.
//! - `DbError`: the error type returned by every operation.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_options};
pub use error::DbError;
pub use memory::InMemoryRepository;
pub use repository::{DbRepository, KillerStore};

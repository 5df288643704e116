//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the domain's
//! submission store port, backed by PostgreSQL via Diesel with async
//! support through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapter**: the repository only translates between Diesel
//!   models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed
//!   to the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to the
//!   port's error variants.

mod diesel_submission_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_submission_repository::DieselSubmissionRepository;
pub use migrations::{MigrationError, run_pending};
pub use pool::{DbPool, PoolError, PoolSettings};

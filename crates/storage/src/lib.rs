//! Persistence for student accounts and the grade ledger.
//!
//! Repository traits live in [`repository`]; [`sqlite`] provides the sqlx
//! backend and its schema migrations.

#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

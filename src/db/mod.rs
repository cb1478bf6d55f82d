//! Database layer
//!
//! This module provides database abstraction for the coursecat service.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration. Repositories
//! work against the `DatabasePool` trait and dispatch per driver.

pub mod migrations;
pub mod ordering;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};

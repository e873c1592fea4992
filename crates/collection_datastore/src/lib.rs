//! # DataStore Module
//!
//! This module provides access to the Postgres database that holds museum
//! collections, their visitor comments and the AI summary stored per collection.
//!
//! The module uses sqlx for database operations and exposes the [`DataStore`]
//! trait so the summary pipeline can be exercised against in-memory doubles.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::DataStore;
pub use domain::{CollectionContext, CollectionMeta, Comment, Summary};

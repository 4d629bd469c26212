//! Persistable documents
//!
//! The store is generic over [`Document`]. Each entity names its collection,
//! its persisted invariants and its unique index keys.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ConnectResult;

/// An entity stored in its own collection.
pub trait Document: Clone + Send + Sync + 'static {
    /// Collection name.
    const COLLECTION: &'static str;

    /// Human-readable label used in error messages ("Job not found").
    const LABEL: &'static str;

    /// Primary key.
    fn id(&self) -> Uuid;

    /// Creation timestamp, used for newest/oldest-first ordering.
    fn created_at(&self) -> DateTime<Utc>;

    /// Bump `updated_at`.
    fn touch(&mut self);

    /// Invariants checked before every insert and update.
    fn validate(&self) -> ConnectResult<()> {
        Ok(())
    }

    /// Unique index entries as `(field, value)`.
    ///
    /// A field the document does not set is simply left out, which gives
    /// sparse-unique semantics: any number of documents may omit it.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Implements the timestamp plumbing of [`Document`] for a struct with
/// `id`, `created_at` and `updated_at` fields.
macro_rules! document_timestamps {
    () => {
        fn id(&self) -> uuid::Uuid {
            self.id
        }

        fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
            self.created_at
        }

        fn touch(&mut self) {
            self.updated_at = chrono::Utc::now();
        }
    };
}

pub(crate) use document_timestamps;

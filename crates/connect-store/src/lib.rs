//! # Connect Store
//!
//! In-process document store for BCET Connect.
//!
//! Each entity type gets a [`Collection`] with the primitives the services
//! rely on:
//!
//! - **insert** with schema validation and unique / sparse-unique keys
//! - **find** with a predicate, newest first
//! - **update_with**: atomic read-modify-write of a single document
//!
//! ```rust
//! use connect_store::Store;
//!
//! let store = Store::new();
//! let users = store.users.clone(); // shares storage
//! ```

pub mod collection;
pub mod store;

pub use collection::Collection;
pub use store::Store;

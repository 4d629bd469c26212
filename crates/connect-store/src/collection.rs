//! A single document collection
//!
//! Documents live in a `HashMap` behind a tokio `RwLock`. Every write
//! validates the document and checks its unique keys while holding the
//! write lock, so a read-modify-write through [`Collection::update_with`]
//! is atomic with respect to every other writer.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use connect_model::{ConnectError, ConnectResult, Document};

/// A typed collection of documents.
///
/// Cloning is cheap and shares the underlying storage.
pub struct Collection<D: Document> {
    docs: Arc<RwLock<HashMap<Uuid, D>>>,
}

impl<D: Document> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
        }
    }
}

impl<D: Document> Default for Collection<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> std::fmt::Debug for Collection<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &D::COLLECTION)
            .finish_non_exhaustive()
    }
}

impl<D: Document> Collection<D> {
    pub fn new() -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// * `ValidationFailed` - the document breaks one of its invariants
    /// * `Conflict` - the id or a unique key is already taken
    pub async fn insert(&self, doc: D) -> ConnectResult<D> {
        doc.validate()?;

        let mut docs = self.docs.write().await;
        if docs.contains_key(&doc.id()) {
            return Err(ConnectError::Conflict(format!(
                "{} already exists",
                D::LABEL
            )));
        }
        check_unique(&docs, &doc)?;

        docs.insert(doc.id(), doc.clone());
        debug!(collection = D::COLLECTION, id = %doc.id(), "Document inserted");
        Ok(doc)
    }

    /// Fetch by id, or `NotFound` with the collection's label.
    pub async fn get(&self, id: Uuid) -> ConnectResult<D> {
        self.find_by_id(id)
            .await
            .ok_or_else(|| ConnectError::not_found(D::LABEL))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<D> {
        self.docs.read().await.get(&id).cloned()
    }

    /// All documents matching `pred`, newest first.
    pub async fn find<F>(&self, pred: F) -> Vec<D>
    where
        F: Fn(&D) -> bool,
    {
        let docs = self.docs.read().await;
        let mut found: Vec<D> = docs.values().filter(|d| pred(d)).cloned().collect();
        found.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        found
    }

    /// Every document, newest first.
    pub async fn all(&self) -> Vec<D> {
        self.find(|_| true).await
    }

    /// The newest document matching `pred`.
    pub async fn find_one<F>(&self, pred: F) -> Option<D>
    where
        F: Fn(&D) -> bool,
    {
        self.find(pred).await.into_iter().next()
    }

    pub async fn count<F>(&self, pred: F) -> usize
    where
        F: Fn(&D) -> bool,
    {
        self.docs.read().await.values().filter(|d| pred(d)).count()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Atomic read-modify-write of one document.
    ///
    /// `f` runs against a copy under the write lock. The copy is written
    /// back only if `f` succeeds and the result still validates and keeps
    /// its unique keys; otherwise the stored document is untouched.
    ///
    /// # Returns
    ///
    /// The stored document after the update and whatever `f` returned
    pub async fn update_with<R, F>(&self, id: Uuid, f: F) -> ConnectResult<(D, R)>
    where
        F: FnOnce(&mut D) -> ConnectResult<R>,
    {
        let mut docs = self.docs.write().await;
        let current = docs
            .get(&id)
            .ok_or_else(|| ConnectError::not_found(D::LABEL))?;

        let mut next = current.clone();
        let out = f(&mut next)?;
        next.touch();
        next.validate()?;
        check_unique(&docs, &next)?;

        docs.insert(id, next.clone());
        trace!(collection = D::COLLECTION, id = %id, "Document updated");
        Ok((next, out))
    }

    /// [`Collection::update_with`] for closures with nothing to return.
    pub async fn update<F>(&self, id: Uuid, f: F) -> ConnectResult<D>
    where
        F: FnOnce(&mut D) -> ConnectResult<()>,
    {
        self.update_with(id, f).await.map(|(doc, ())| doc)
    }

    /// Remove a document.
    pub async fn delete(&self, id: Uuid) -> ConnectResult<D> {
        let removed = self
            .docs
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| ConnectError::not_found(D::LABEL))?;
        debug!(collection = D::COLLECTION, id = %id, "Document deleted");
        Ok(removed)
    }
}

fn check_unique<D: Document>(docs: &HashMap<Uuid, D>, doc: &D) -> ConnectResult<()> {
    for (field, value) in doc.unique_keys() {
        let taken = docs.values().any(|other| {
            other.id() != doc.id()
                && other
                    .unique_keys()
                    .iter()
                    .any(|(f, v)| *f == field && *v == value)
        });
        if taken {
            return Err(ConnectError::Conflict(format!(
                "{} already exists with this {}",
                D::LABEL,
                field
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_model::{Donation, DonationPurpose, DonationStatus, User};
    use connect_rbac::Role;

    fn user(email: &str) -> User {
        User::new("Test User", email, "hash", Role::Student)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let users = Collection::<User>::new();
        let u = users.insert(user("a@bcet.edu")).await.unwrap();
        assert_eq!(users.get(u.id).await.unwrap().email, "a@bcet.edu");
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_uses_label() {
        let users = Collection::<User>::new();
        let err = users.get(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err, ConnectError::NotFound("User not found".into()));
    }

    #[tokio::test]
    async fn test_unique_email() {
        let users = Collection::<User>::new();
        users.insert(user("dup@bcet.edu")).await.unwrap();
        let err = users.insert(user("DUP@bcet.edu")).await.unwrap_err();
        assert!(matches!(err, ConnectError::Conflict(_)));
        assert_eq!(users.len().await, 1);
    }

    #[tokio::test]
    async fn test_validation_runs_on_insert() {
        let users = Collection::<User>::new();
        let err = users.insert(User::new("ab", "x@bcet.edu", "h", Role::Student)).await;
        assert!(matches!(err, Err(ConnectError::ValidationFailed(_))));
        assert!(users.is_empty().await);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_document_untouched() {
        let users = Collection::<User>::new();
        let u = users.insert(user("keep@bcet.edu")).await.unwrap();

        let result = users
            .update(u.id, |doc| {
                doc.name = "Changed".into();
                Err(ConnectError::InvalidState("nope".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(users.get(u.id).await.unwrap().name, "Test User");

        // invalid after mutation
        let result = users.update(u.id, |doc| {
            doc.name = "x".into();
            Ok(())
        });
        assert!(matches!(result.await, Err(ConnectError::ValidationFailed(_))));
        assert_eq!(users.get(u.id).await.unwrap().name, "Test User");
    }

    #[tokio::test]
    async fn test_update_touches_and_returns() {
        let users = Collection::<User>::new();
        let u = users.insert(user("t@bcet.edu")).await.unwrap();
        let (updated, old) = users
            .update_with(u.id, |doc| {
                let old = doc.name.clone();
                doc.name = "Renamed User".into();
                Ok(old)
            })
            .await
            .unwrap();
        assert_eq!(old, "Test User");
        assert_eq!(updated.name, "Renamed User");
        assert!(updated.updated_at >= u.updated_at);
    }

    #[tokio::test]
    async fn test_sparse_unique_transaction_id() {
        let donations = Collection::<Donation>::new();
        let owner = Uuid::now_v7();
        donations
            .insert(Donation::new(owner, 100.0, DonationPurpose::General))
            .await
            .unwrap();
        donations
            .insert(Donation::new(owner, 200.0, DonationPurpose::General))
            .await
            .unwrap();

        let paid = Donation::new(owner, 300.0, DonationPurpose::General).with_transaction_id("TX-1");
        donations.insert(paid).await.unwrap();
        let dup = Donation::new(owner, 400.0, DonationPurpose::General).with_transaction_id("TX-1");
        assert!(matches!(donations.insert(dup).await, Err(ConnectError::Conflict(_))));
        assert_eq!(donations.count(|d| d.status == DonationStatus::Pending).await, 3);
    }

    #[tokio::test]
    async fn test_find_newest_first_and_delete() {
        let users = Collection::<User>::new();
        let first = users.insert(user("1@bcet.edu")).await.unwrap();
        let second = users.insert(user("2@bcet.edu")).await.unwrap();

        let all = users.all().await;
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);

        let found = users.find_one(|u| u.email == "1@bcet.edu").await.unwrap();
        assert_eq!(found.id, first.id);

        users.delete(first.id).await.unwrap();
        assert!(users.find_by_id(first.id).await.is_none());
        assert!(users.delete(first.id).await.is_err());
    }
}

//! In-memory record collection

use crate::filter::Filter;
use crate::ports::Collection;
use crate::record::Record;
use crate::{Result, RosterError};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Collection kept in a `Vec` behind a lock, preserving insertion order
pub struct MemoryCollection<R> {
    inner: RwLock<Inner<R>>,
}

struct Inner<R> {
    records: Vec<R>,
    /// Every id ever handed out, so deleted ids are never reissued.
    /// Never pruned: it grows by one id per create for the life of the
    /// collection.
    issued: HashSet<Uuid>,
}

impl<R> Inner<R> {
    fn allocate_id(&mut self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.issued.insert(id) {
                return id;
            }
        }
    }
}

impl<R: Record> Inner<R> {
    fn position(&self, id: Uuid) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id() == id)
            .ok_or(RosterError::NotFound {
                collection: R::COLLECTION,
                id,
            })
    }
}

impl<R: Record> MemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                issued: HashSet::new(),
            }),
        }
    }
}

impl<R: Record> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> Collection<R> for MemoryCollection<R> {
    async fn find_one(&self, filter: &Filter<R::Field>) -> Result<Option<R>> {
        let inner = self.inner.read().await;
        for record in &inner.records {
            if filter.matches(record)? {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn find_many(&self, filter: Option<&Filter<R::Field>>) -> Result<Vec<R>> {
        let inner = self.inner.read().await;
        let Some(filter) = filter else {
            return Ok(inner.records.clone());
        };

        let mut found = Vec::new();
        for record in &inner.records {
            if filter.matches(record)? {
                found.push(record.clone());
            }
        }
        Ok(found)
    }

    async fn create(&self, draft: R::Draft) -> Result<R> {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let record = R::from_draft(id, draft);
        record.validate()?;

        debug!("Created {} record {}", R::COLLECTION, id);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn change(&self, id: Uuid, patch: R::Patch) -> Result<R> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;

        // Validate a copy so a rejected patch leaves the stored record alone
        let mut updated = inner.records[index].clone();
        updated.apply(patch);
        updated.validate()?;

        debug!("Changed {} record {}", R::COLLECTION, id);
        inner.records[index] = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<R> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;

        debug!("Deleted {} record {}", R::COLLECTION, id);
        Ok(inner.records.remove(index))
    }

    async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::UserField;
    use roster_types::{User, UserDraft, UserPatch};
    use tokio_test::{assert_err, assert_ok};

    fn draft(first_name: &str) -> UserDraft {
        UserDraft {
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
        }
    }

    #[tokio::test]
    async fn test_created_ids_are_distinct() {
        let users = MemoryCollection::<User>::new();

        let mut ids = HashSet::new();
        for i in 0..50 {
            let user = users.create(draft(&format!("User{i}"))).await.unwrap();
            assert!(ids.insert(user.id));
        }
        assert_eq!(users.len().await, 50);
    }

    #[tokio::test]
    async fn test_find_after_create() {
        let users = MemoryCollection::<User>::new();
        let created = users.create(draft("Jo")).await.unwrap();

        let found = users
            .find_one(&Filter::equals(UserField::Id, created.id))
            .await
            .unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_one_returns_earliest_match() {
        let users = MemoryCollection::<User>::new();
        let first = assert_ok!(users.create(draft("Jo")).await);
        let mut second_draft = draft("Jo");
        second_draft.email = "jo.two@example.com".to_string();
        let second = assert_ok!(users.create(second_draft).await);
        assert_ne!(first.id, second.id);

        let found = assert_ok!(
            users
                .find_one(&Filter::equals(UserField::FirstName, "Jo"))
                .await
        );
        assert_eq!(found.map(|u| u.id), Some(first.id));

        // Still the earliest after the first one is changed in place
        assert_ok!(
            users
                .change(first.id, UserPatch::subscriptions(vec![second.id]))
                .await
        );
        let found = assert_ok!(
            users
                .find_one(&Filter::equals(UserField::FirstName, "Jo"))
                .await
        );
        assert_eq!(found.map(|u| u.id), Some(first.id));
    }

    #[tokio::test]
    async fn test_find_one_miss_is_not_an_error() {
        let users = MemoryCollection::<User>::new();

        let found = assert_ok!(
            users
                .find_one(&Filter::equals(UserField::Id, Uuid::new_v4()))
                .await
        );
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_removes() {
        let users = MemoryCollection::<User>::new();
        let created = users.create(draft("Jo")).await.unwrap();

        let deleted = users.delete(created.id).await.unwrap();
        assert_eq!(deleted, created);

        let found = users
            .find_one(&Filter::equals(UserField::Id, created.id))
            .await
            .unwrap();
        assert!(found.is_none());

        let second = assert_err!(users.delete(created.id).await);
        assert_eq!(
            second,
            RosterError::NotFound {
                collection: "users",
                id: created.id,
            }
        );
        assert!(users.is_empty().await);
    }

    #[tokio::test]
    async fn test_find_many_keeps_insertion_order() {
        let users = MemoryCollection::<User>::new();
        let a = users.create(draft("Ann")).await.unwrap();
        let b = users.create(draft("Bob")).await.unwrap();
        let c = users.create(draft("Cat")).await.unwrap();

        // A change must not move the record
        users
            .change(a.id, UserPatch::subscriptions(vec![c.id]))
            .await
            .unwrap();

        let all: Vec<Uuid> = users
            .find_many(None)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(all, vec![a.id, b.id, c.id]);

        let followers = users
            .find_many(Some(&Filter::contains(UserField::SubscribedToUserIds, c.id)))
            .await
            .unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, a.id);
    }

    #[tokio::test]
    async fn test_change_patches_only_named_fields() {
        let users = MemoryCollection::<User>::new();
        let created = users.create(draft("Jo")).await.unwrap();

        users
            .change(
                created.id,
                UserPatch {
                    email: Some("x@y.com".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        let found = users
            .find_one(&Filter::equals(UserField::Id, created.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.email, "x@y.com");
        assert_eq!(found.first_name, created.first_name);
        assert_eq!(found.last_name, created.last_name);
        assert_eq!(found.subscribed_to_user_ids, created.subscribed_to_user_ids);
    }

    #[tokio::test]
    async fn test_change_missing_record() {
        let users = MemoryCollection::<User>::new();
        let id = Uuid::new_v4();

        let err = assert_err!(users.change(id, UserPatch::default()).await);
        assert_eq!(
            err,
            RosterError::NotFound {
                collection: "users",
                id,
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_change_leaves_record_untouched() {
        let users = MemoryCollection::<User>::new();
        let created = users.create(draft("Jo")).await.unwrap();

        let err = assert_err!(
            users
                .change(
                    created.id,
                    UserPatch {
                        first_name: Some(String::new()),
                        ..UserPatch::default()
                    },
                )
                .await
        );
        assert!(matches!(err, RosterError::Validation(_)));

        let found = users
            .find_one(&Filter::equals(UserField::Id, created.id))
            .await
            .unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_fields() {
        let users = MemoryCollection::<User>::new();

        let err = assert_err!(users.create(draft("")).await);
        assert!(matches!(err, RosterError::Validation(_)));
        assert!(users.is_empty().await);
    }
}

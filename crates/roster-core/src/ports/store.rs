//! Storage trait for record collections

use crate::filter::Filter;
use crate::record::Record;
use crate::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// A collection of records keyed by unique id.
///
/// Ids are allocated by the collection and never reused. Iteration follows
/// insertion order.
#[async_trait]
pub trait Collection<R: Record>: Send + Sync {
    /// First record matching `filter`, if any
    async fn find_one(&self, filter: &Filter<R::Field>) -> Result<Option<R>>;

    /// All records matching `filter`, or every record when `filter` is `None`
    async fn find_many(&self, filter: Option<&Filter<R::Field>>) -> Result<Vec<R>>;

    async fn create(&self, draft: R::Draft) -> Result<R>;

    /// Apply `patch` to the record with `id` and persist it
    async fn change(&self, id: Uuid, patch: R::Patch) -> Result<R>;

    async fn delete(&self, id: Uuid) -> Result<R>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

//! Student store interface
//!
//! Row-level access implemented once per persistence backend. Business
//! rules (pagination, conflicts, not-found) live in the application
//! layer on top of this trait.

use async_trait::async_trait;

use super::{NewStudent, Student, StudentPatch};
use crate::domain::DomainResult;

/// Which rows a read applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StudentFilter {
    All,
    /// Case-insensitive substring match on `name`
    NameContains(String),
    Rga(String),
    /// Same `rga`, or the same `(name, rga, course)` triple
    Duplicate {
        name: String,
        rga: String,
        course: String,
    },
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn count(&self, filter: &StudentFilter) -> DomainResult<u64>;

    /// All matching rows, oldest registration first. Ties are broken
    /// deterministically so windows never overlap.
    async fn fetch_all(&self, filter: &StudentFilter) -> DomainResult<Vec<Student>>;

    /// One window of matching rows, same ordering as [`fetch_all`](Self::fetch_all).
    async fn fetch_window(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> DomainResult<Vec<Student>>;

    async fn fetch_one(&self, id: &str) -> DomainResult<Option<Student>>;

    async fn insert(&self, student: NewStudent) -> DomainResult<Student>;

    async fn update_fields(&self, id: &str, patch: StudentPatch) -> DomainResult<Option<Student>>;

    /// Returns the row as it was before deletion.
    async fn delete_by_id(&self, id: &str) -> DomainResult<Option<Student>>;

    /// Drop cached read state so the next read hits the backend.
    async fn invalidate_read_cache(&self);
}

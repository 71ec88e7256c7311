//! Student query repository: application-layer orchestration
//!
//! Callers (HTTP handlers) go through this type only. It validates
//! pagination input before touching the store, turns absent rows into
//! `NotFound`, enforces the duplicate rules on writes and invalidates the
//! store's read cache after every write.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    DomainError, DomainResult, NewStudent, Student, StudentFilter, StudentPatch, StudentStore,
};
use crate::shared::{PaginatedResult, PaginationPolicy};

pub struct StudentQueryRepository {
    store: Arc<dyn StudentStore>,
    pagination: PaginationPolicy,
}

impl StudentQueryRepository {
    pub fn new(store: Arc<dyn StudentStore>, pagination: PaginationPolicy) -> Self {
        Self { store, pagination }
    }

    // ── Reads ───────────────────────────────────────────────────

    pub async fn get_all(&self) -> DomainResult<Vec<Student>> {
        self.store.fetch_all(&StudentFilter::All).await
    }

    pub async fn get_all_paged(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> DomainResult<PaginatedResult<Student>> {
        self.paged(StudentFilter::All, page, limit).await
    }

    pub async fn get_by_name(&self, name: &str) -> DomainResult<Vec<Student>> {
        let filter = name_filter(name)?;
        self.store.fetch_all(&filter).await
    }

    /// `total_item_count` of the result is the number of matching rows,
    /// not the table size.
    pub async fn get_by_name_paged(
        &self,
        name: &str,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> DomainResult<PaginatedResult<Student>> {
        let filter = name_filter(name)?;
        self.paged(filter, page, limit).await
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<Student> {
        self.store
            .fetch_one(id)
            .await?
            .ok_or_else(|| DomainError::student_not_found(id))
    }

    async fn paged(
        &self,
        filter: StudentFilter,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> DomainResult<PaginatedResult<Student>> {
        let request = self.pagination.resolve(page, limit)?;

        let total = self.store.count(&filter).await?;
        let window = request.window(total);
        debug!(?filter, page = window.page, limit = window.limit, total, "Fetching student page");

        let items = if window.offset >= total {
            Vec::new()
        } else {
            self.store
                .fetch_window(&filter, window.offset, window.limit)
                .await?
        };

        Ok(PaginatedResult::new(items, total, window))
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Add a student. Fails with `Conflict` when the RGA is taken or the
    /// same `(name, rga, course)` record exists.
    pub async fn add(&self, student: NewStudent) -> DomainResult<Student> {
        let duplicate = StudentFilter::Duplicate {
            name: student.name.clone(),
            rga: student.rga.clone(),
            course: student.course.clone(),
        };
        if self.store.count(&duplicate).await? > 0 {
            return Err(DomainError::Conflict(format!(
                "Student with rga '{}' already exists",
                student.rga
            )));
        }

        let result = self.store.insert(student).await;
        let created = self.after_write(result).await?;

        info!(id = %created.id, rga = %created.rga, "Student added");
        Ok(created)
    }

    /// Overwrite only the fields present in `patch`.
    pub async fn update(&self, id: &str, patch: StudentPatch) -> DomainResult<Student> {
        let current = self.get_by_id(id).await?;

        if patch.is_empty() {
            return Ok(current);
        }

        if let Some(rga) = patch.rga.as_deref() {
            if rga != current.rga
                && self.store.count(&StudentFilter::Rga(rga.to_string())).await? > 0
            {
                return Err(DomainError::Conflict(format!(
                    "Student with rga '{}' already exists",
                    rga
                )));
            }
        }

        let result = self.store.update_fields(id, patch).await;
        let updated = self
            .after_write(result)
            .await?
            .ok_or_else(|| DomainError::student_not_found(id))?;

        info!(id = %updated.id, rga = %updated.rga, "Student updated");
        Ok(updated)
    }

    /// Delete a student and return the record as it was.
    pub async fn delete(&self, id: &str) -> DomainResult<Student> {
        let result = self.store.delete_by_id(id).await;
        let deleted = self
            .after_write(result)
            .await?
            .ok_or_else(|| DomainError::student_not_found(id))?;

        info!(id = %deleted.id, rga = %deleted.rga, "Student deleted");
        Ok(deleted)
    }

    /// Reads issued after a write returns must not see cached pre-write state.
    async fn after_write<T>(&self, result: DomainResult<T>) -> DomainResult<T> {
        self.store.invalidate_read_cache().await;
        result
    }
}

fn name_filter(name: &str) -> DomainResult<StudentFilter> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("name must not be empty".into()));
    }
    Ok(StudentFilter::NameContains(name.to_string()))
}

//! In-memory student store for development and testing

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, NewStudent, Student, StudentFilter, StudentPatch, StudentStore,
};

/// Rows live in a `DashMap`; a sequence number keeps insertion order
/// stable for students registered within the same clock tick.
///
/// `rga_owners` plays the part of the unique index on `students.rga`: an
/// rga is claimed through its entry before the row is written, so two
/// concurrent writers cannot both take it.
pub struct InMemoryStudentStore {
    students: DashMap<String, (u64, Student)>,
    rga_owners: DashMap<String, String>,
    sequence: AtomicU64,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self {
            students: DashMap::new(),
            rga_owners: DashMap::new(),
            sequence: AtomicU64::new(1),
        }
    }

    fn matching(&self, filter: &StudentFilter) -> Vec<Student> {
        let mut rows: Vec<(u64, Student)> = self
            .students
            .iter()
            .filter(|entry| matches(filter, &entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            a.registered_in
                .cmp(&b.registered_in)
                .then(a_seq.cmp(b_seq))
        });
        rows.into_iter().map(|(_, s)| s).collect()
    }

    /// Claim `rga` for `id`. Returns whether a new claim was made; an rga
    /// `id` already owns is not a conflict.
    fn claim_rga(&self, rga: &str, id: &str) -> DomainResult<bool> {
        match self.rga_owners.entry(rga.to_string()) {
            Entry::Occupied(owner) if owner.get() == id => Ok(false),
            Entry::Occupied(_) => Err(rga_conflict(rga)),
            Entry::Vacant(slot) => {
                slot.insert(id.to_string());
                Ok(true)
            }
        }
    }

    fn release_rga(&self, rga: &str, id: &str) {
        self.rga_owners.remove_if(rga, |_, owner| owner == id);
    }
}

impl Default for InMemoryStudentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(filter: &StudentFilter, student: &Student) -> bool {
    match filter {
        StudentFilter::All => true,
        StudentFilter::NameContains(needle) => student
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        StudentFilter::Rga(rga) => &student.rga == rga,
        StudentFilter::Duplicate { name, rga, course } => {
            &student.rga == rga
                || (&student.name == name && &student.rga == rga && &student.course == course)
        }
    }
}

fn rga_conflict(rga: &str) -> DomainError {
    DomainError::Conflict(format!("Student with rga '{}' already exists", rga))
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn count(&self, filter: &StudentFilter) -> DomainResult<u64> {
        Ok(self
            .students
            .iter()
            .filter(|entry| matches(filter, &entry.value().1))
            .count() as u64)
    }

    async fn fetch_all(&self, filter: &StudentFilter) -> DomainResult<Vec<Student>> {
        Ok(self.matching(filter))
    }

    async fn fetch_window(
        &self,
        filter: &StudentFilter,
        offset: u64,
        limit: u64,
    ) -> DomainResult<Vec<Student>> {
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn fetch_one(&self, id: &str) -> DomainResult<Option<Student>> {
        Ok(self.students.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn insert(&self, student: NewStudent) -> DomainResult<Student> {
        let id = uuid::Uuid::new_v4().to_string();
        self.claim_rga(&student.rga, &id)?;

        let created = Student {
            id,
            rga: student.rga,
            name: student.name,
            course: student.course,
            status: student.status,
            registered_in: Utc::now(),
        };
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.students
            .insert(created.id.clone(), (seq, created.clone()));
        Ok(created)
    }

    async fn update_fields(&self, id: &str, patch: StudentPatch) -> DomainResult<Option<Student>> {
        let claimed = match patch.rga.as_deref() {
            Some(rga) => self.claim_rga(rga, id)?,
            None => false,
        };

        let Some(mut entry) = self.students.get_mut(id) else {
            if let (true, Some(rga)) = (claimed, patch.rga.as_deref()) {
                self.release_rga(rga, id);
            }
            return Ok(None);
        };
        let previous_rga = entry.value().1.rga.clone();
        patch.apply_to(&mut entry.value_mut().1);
        let updated = entry.value().1.clone();
        drop(entry);

        if previous_rga != updated.rga {
            self.release_rga(&previous_rga, id);
        }
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: &str) -> DomainResult<Option<Student>> {
        let removed = self.students.remove(id).map(|(_, (_, student))| student);
        if let Some(student) = &removed {
            self.release_rga(&student.rga, id);
        }
        Ok(removed)
    }

    async fn invalidate_read_cache(&self) {}
}

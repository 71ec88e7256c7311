//! Student domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enrollment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentStatus {
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "inativo")]
    Inactive,
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ativo"),
            Self::Inactive => write!(f, "inativo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    /// Registration code, unique across students
    pub rga: String,
    pub name: String,
    pub course: String,
    pub status: Option<StudentStatus>,
    /// Set once, when the record is created
    pub registered_in: DateTime<Utc>,
}

/// Fields supplied when adding a student. The store assigns `id` and
/// `registered_in`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub rga: String,
    pub course: String,
    pub status: Option<StudentStatus>,
}

/// Partial update. `None` means "leave unchanged"; `Some` always
/// overwrites, including with an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub rga: Option<String>,
    pub course: Option<String>,
    pub status: Option<StudentStatus>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.rga.is_none() && self.course.is_none() && self.status.is_none()
    }

    /// Apply the supplied fields to `student` in place.
    pub fn apply_to(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.clone();
        }
        if let Some(rga) = &self.rga {
            student.rga = rga.clone();
        }
        if let Some(course) = &self.course {
            student.course = course.clone();
        }
        if let Some(status) = self.status {
            student.status = Some(status);
        }
    }
}

pub mod student;

// Re-export commonly used types
pub use student::{NewStudent, Student, StudentFilter, StudentPatch, StudentStatus, StudentStore};

pub use crate::shared::types::errors::{DomainError, DomainResult};

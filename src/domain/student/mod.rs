//! Student aggregate
//!
//! Contains the Student entity, its write DTOs, and the store interface.

pub mod model;
pub mod store;

pub use model::{NewStudent, Student, StudentPatch, StudentStatus};
pub use store::{StudentFilter, StudentStore};

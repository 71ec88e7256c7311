//! Students module: CRUD and paginated listing of student records

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

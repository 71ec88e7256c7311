//! Student use-cases

pub mod repository;

pub use repository::StudentQueryRepository;

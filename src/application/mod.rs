//! Application layer: use-cases orchestrating the domain ports.

pub mod students;

pub use students::StudentQueryRepository;

//! Non-relational store implementations

mod memory;

pub use memory::InMemoryStudentStore;

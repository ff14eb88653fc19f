pub mod database;
pub mod error_handling;
pub mod in_memory;

pub use database::*;
pub use in_memory::InMemoryTaskRepository;

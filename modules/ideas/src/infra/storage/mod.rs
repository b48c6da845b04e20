pub mod entity;
pub mod memory;
pub mod postgrest;

pub use memory::InMemoryIdeasRepository;
pub use postgrest::PostgrestIdeasRepository;

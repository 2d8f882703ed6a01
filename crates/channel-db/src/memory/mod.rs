//! In-memory store (for testing/development)

mod store;

pub use store::MemoryStore;

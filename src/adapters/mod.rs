// Adapters layer: concrete implementations of the domain ports.

pub mod file_store;
pub mod memory;

pub use file_store::FileStore;
pub use memory::{InMemoryStore, StaticSettings};

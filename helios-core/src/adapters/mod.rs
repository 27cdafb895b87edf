//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - In-memory map for the SessionStore port (tests, one-shot runs)
//! - JSON file for the SessionStore port
//! - Local filesystem for saving exported downloads

pub mod download;
pub mod file_store;
pub mod memory_store;

pub use download::save_download;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

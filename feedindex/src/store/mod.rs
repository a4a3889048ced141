//! Storage backends for index documents.
//!
//! - [`FileIndexStore`] - JSON file on local disk
//! - [`MemoryIndexStore`] - document held in memory

mod file;
mod memory;
mod traits;

pub use file::FileIndexStore;
pub use memory::MemoryIndexStore;
pub use traits::{BoxFuture, IndexStore};

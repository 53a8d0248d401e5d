pub mod extractor;
pub mod store;

pub use extractor::{extract_text, DocumentFormat};
pub use store::{FileStore, KeyValueStore, MemoryStore};

mod annotation_cache;
mod types;

pub use annotation_cache::AnnotationCache;
pub use types::{CacheEntry, CacheStats, ContentHash};

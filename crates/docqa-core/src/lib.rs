pub mod chunking;
pub mod error;
pub mod loader;
pub mod models;
pub mod prompt;
pub mod traits;

pub use error::{RagError, Result};
pub use models::{
    Chunk, ChunkId, ChunkMetadata, ChunkParams, Context, ContextSource, Document,
    EmbeddingRecord, QueryMatch,
};

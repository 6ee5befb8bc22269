use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A source document as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name, or relative path for recursive loads
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Window length and overlap in characters, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkParams {
    chunk_size: usize,
    overlap: usize,
}

impl ChunkParams {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::invalid_parameter(
                "chunk_size",
                "must be greater than 0",
            ));
        }
        if overlap >= chunk_size {
            return Err(RagError::invalid_parameter(
                "overlap",
                format!("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"),
            ));
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance between the starts of consecutive windows
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

/// A contiguous slice of a document; offsets count chars, not bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub document_id: String,
    pub index: usize,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn id(&self, params: ChunkParams) -> ChunkId {
        ChunkId {
            document_id: self.document_id.clone(),
            chunk_size: params.chunk_size(),
            overlap: params.overlap(),
            index: self.index,
        }
    }

    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// Stable identity of a chunk across re-ingestion with the same parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId {
    pub document_id: String,
    pub chunk_size: usize,
    pub overlap: usize,
    pub index: usize,
}

impl ChunkId {
    /// Key prefix shared by every record of `document_id`
    pub fn document_prefix(document_id: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(document_id.len() + 1);
        key.extend_from_slice(document_id.as_bytes());
        key.push(0);
        key
    }

    /// `document_id`, NUL, then size, overlap and index as big-endian u64
    pub fn storage_key(&self) -> Vec<u8> {
        let mut key = Self::document_prefix(&self.document_id);
        key.extend_from_slice(&(self.chunk_size as u64).to_be_bytes());
        key.extend_from_slice(&(self.overlap as u64).to_be_bytes());
        key.extend_from_slice(&(self.index as u64).to_be_bytes());
        key
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}-{}#{}",
            self.document_id, self.chunk_size, self.overlap, self.index
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Owning document id
    pub source: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub start: usize,
    pub end: usize,
    pub chunk_size: usize,
    pub overlap: usize,
    /// Hex SHA-256 of the chunk text
    pub content_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub id: ChunkId,
    pub vector: Vec<f32>,
    pub text: String,
    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: ChunkId,
    pub text: String,
    pub metadata: ChunkMetadata,
    /// Cosine similarity to the query vector
    pub score: f32,
}

impl QueryMatch {
    pub fn document_id(&self) -> &str {
        &self.metadata.source
    }
}

/// A chunk that made it into an assembled context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSource {
    pub document_id: String,
    pub chunk_index: usize,
    pub score: f32,
}

/// Retrieved passages joined for the generator, within a character budget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub text: String,
    pub sources: Vec<ContextSource>,
    /// Ranked matches left out because they did not fit
    pub omitted: usize,
}

impl Context {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

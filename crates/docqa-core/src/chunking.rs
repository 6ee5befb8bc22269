//! Fixed-window character chunking

use crate::error::Result;
use crate::models::{Chunk, ChunkParams, Document};

/// Split `text` into overlapping windows of `chunk_size` chars
///
/// Windows start at 0 and advance by `chunk_size - overlap`. The last window is
/// clipped to the end of the text and splitting stops once a window reaches it.
/// The returned chunks carry an empty `document_id`; see [`split_document`].
pub fn split(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    let params = ChunkParams::new(chunk_size, overlap)?;
    Ok(split_with(text, "", params))
}

pub fn split_document(document: &Document, params: ChunkParams) -> Vec<Chunk> {
    split_with(&document.text, &document.id, params)
}

fn split_with(text: &str, document_id: &str, params: ChunkParams) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, including the end of the text.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let len = boundaries.len() - 1;

    let mut chunks = Vec::with_capacity(len / params.stride() + 1);
    let mut start = 0;
    loop {
        let end = (start + params.chunk_size()).min(len);
        chunks.push(Chunk {
            document_id: document_id.to_string(),
            index: chunks.len(),
            text: text[boundaries[start]..boundaries[end]].to_string(),
            start,
            end,
        });
        if end >= len {
            break;
        }
        start += params.stride();
    }

    chunks
}

use crate::error::Result;
use crate::models::{ChunkId, Context, EmbeddingRecord, QueryMatch};
use async_trait::async_trait;

/// Maps texts to fixed-dimension vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            crate::RagError::InvalidInput("embedder returned no vector".to_string())
        })
    }

    fn model(&self) -> &str;
}

/// Persisted nearest-neighbour store keyed by [`ChunkId`]
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace records; the whole call is atomic
    async fn upsert(&self, records: Vec<EmbeddingRecord>) -> Result<()>;

    /// Swap every record of `document_id` for `records`, returning how many were removed
    async fn replace_document(
        &self,
        document_id: &str,
        records: Vec<EmbeddingRecord>,
    ) -> Result<usize>;

    /// Up to `k` matches by cosine similarity, best first
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<QueryMatch>>;

    async fn get(&self, id: &ChunkId) -> Result<Option<EmbeddingRecord>>;

    async fn delete_document(&self, document_id: &str) -> Result<usize>;

    async fn count(&self) -> Result<usize>;
}

/// Produces an answer from a question and retrieved context
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, question: &str, context: &Context) -> Result<String>;
}

/// Raw prompt-in, text-out language model
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RagError;

    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model(&self) -> &str {
            "length"
        }
    }

    struct SilentEmbedder;

    #[async_trait]
    impl Embedder for SilentEmbedder {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(Vec::new())
        }

        fn model(&self) -> &str {
            "silent"
        }
    }

    #[tokio::test]
    async fn test_embed_defaults_to_batch_of_one() {
        let vector = LengthEmbedder.embed("abcd").await.unwrap();
        assert_eq!(vector, vec![4.0, 1.0]);
    }

    #[tokio::test]
    async fn test_embed_without_vector_is_invalid_input() {
        let err = SilentEmbedder.embed("abcd").await.unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }
}

//! Persisted brute-force cosine index on sled

use crate::similarity::cosine;
use crate::storage::{decode, Store, Tree, WriteBatch};
use async_trait::async_trait;
use docqa_config::CoreConfig;
use docqa_core::traits::VectorIndex;
use docqa_core::{ChunkId, EmbeddingRecord, QueryMatch, RagError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Value stored under [`ChunkId::storage_key`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecord {
    /// Insertion order, kept when the record is replaced
    seq: u64,
    record: EmbeddingRecord,
}

/// One sled tree per collection, keyed so a document's records share a prefix
#[derive(Clone)]
pub struct SledVectorIndex {
    store: Store,
    tree: Tree,
    path: PathBuf,
    collection: String,
}

impl SledVectorIndex {
    pub fn open(path: &Path, collection: &str) -> Result<Self> {
        let store = Store::open(path)?;
        let tree = store.open_tree(collection)?;
        debug!(
            "opened collection '{}' at {} ({} records)",
            collection,
            path.display(),
            tree.len()
        );
        Ok(Self {
            store,
            tree,
            path: path.to_path_buf(),
            collection: collection.to_string(),
        })
    }

    pub fn from_config(config: &CoreConfig) -> Result<Self> {
        Self::open(&config.index_dir, &config.collection)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Record count per document id
    pub fn documents(&self) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let stored: StoredRecord = decode(&value)?;
            *counts.entry(stored.record.metadata.source).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub async fn flush(&self) -> Result<()> {
        self.store.flush().await
    }

    /// Stage inserts for `records`, keeping the seq of keys that already exist
    ///
    /// `previous` holds seqs of records about to be removed in the same batch.
    fn stage_records(
        &self,
        batch: &mut WriteBatch,
        records: Vec<EmbeddingRecord>,
        previous: &HashMap<Vec<u8>, u64>,
    ) -> Result<()> {
        let mut staged: HashMap<Vec<u8>, u64> = HashMap::new();
        for record in records {
            let key = record.id.storage_key();
            let seq = match staged.get(&key).or_else(|| previous.get(&key)) {
                Some(seq) => *seq,
                None => match self.tree.get_decoded::<_, StoredRecord>(&key)? {
                    Some(existing) => existing.seq,
                    None => self.store.generate_id()?,
                },
            };
            batch.insert_encoded(&key, &StoredRecord { seq, record })?;
            staged.insert(key, seq);
        }
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for SledVectorIndex {
    async fn upsert(&self, records: Vec<EmbeddingRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let count = records.len();
        let mut batch = WriteBatch::new();
        self.stage_records(&mut batch, records, &HashMap::new())?;
        self.tree.apply(batch)?;
        debug!("upserted {} records into '{}'", count, self.collection);
        Ok(())
    }

    async fn replace_document(
        &self,
        document_id: &str,
        records: Vec<EmbeddingRecord>,
    ) -> Result<usize> {
        if let Some(stray) = records.iter().find(|r| r.id.document_id != document_id) {
            return Err(RagError::InvalidInput(format!(
                "record {} does not belong to document {}",
                stray.id, document_id
            )));
        }

        let mut previous = HashMap::new();
        for item in self.tree.scan_prefix(ChunkId::document_prefix(document_id)) {
            let (key, value) = item?;
            let stored: StoredRecord = decode(&value)?;
            previous.insert(key, stored.seq);
        }

        let incoming: HashSet<Vec<u8>> = records.iter().map(|r| r.id.storage_key()).collect();
        let mut batch = WriteBatch::new();
        let mut removed = 0;
        for key in previous.keys() {
            if !incoming.contains(key) {
                batch.remove(key);
                removed += 1;
            }
        }
        self.stage_records(&mut batch, records, &previous)?;
        if batch.is_empty() {
            return Ok(0);
        }
        self.tree.apply(batch)?;

        debug!(
            "replaced document {} in '{}' ({} stale records removed)",
            document_id, self.collection, removed
        );
        Ok(removed)
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<QueryMatch>> {
        if k == 0 {
            return Err(RagError::invalid_parameter("k", "must be greater than 0"));
        }
        if self.tree.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f32, u64, EmbeddingRecord)> = Vec::new();
        for item in self.tree.iter() {
            let (_, value) = item?;
            let stored: StoredRecord = decode(&value)?;
            if stored.record.vector.len() != vector.len() {
                return Err(RagError::InvalidInput(format!(
                    "query has dimension {} but {} has dimension {}",
                    vector.len(),
                    stored.record.id,
                    stored.record.vector.len()
                )));
            }
            let score = cosine(vector, &stored.record.vector);
            scored.push((score, stored.seq, stored.record));
        }

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, _, record)| QueryMatch {
                id: record.id,
                text: record.text,
                metadata: record.metadata,
                score,
            })
            .collect())
    }

    async fn get(&self, id: &ChunkId) -> Result<Option<EmbeddingRecord>> {
        Ok(self
            .tree
            .get_decoded::<_, StoredRecord>(id.storage_key())?
            .map(|stored| stored.record))
    }

    async fn delete_document(&self, document_id: &str) -> Result<usize> {
        let keys = self
            .tree
            .keys_with_prefix(ChunkId::document_prefix(document_id))?;
        let removed = keys.len();
        if removed == 0 {
            return Ok(0);
        }
        let mut batch = WriteBatch::new();
        for key in keys {
            batch.remove(key);
        }
        self.tree.apply(batch)?;
        debug!("deleted {} records of {}", removed, document_id);
        Ok(removed)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.tree.len())
    }
}

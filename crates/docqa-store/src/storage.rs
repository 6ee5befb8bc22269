use docqa_core::{RagError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub(crate) fn unavailable(err: impl std::fmt::Display) -> RagError {
    RagError::IndexUnavailable(err.to_string())
}

/// Opaque wrapper around the underlying storage engine (sled).
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| unavailable(format!("failed to open {}: {}", path.display(), e)))?;
        Ok(Self { db })
    }

    pub fn open_tree(&self, name: &str) -> Result<Tree> {
        let tree = self.db.open_tree(name).map_err(unavailable)?;
        Ok(Tree { inner: tree })
    }

    /// Monotonic id, unique for the lifetime of the database
    pub fn generate_id(&self) -> Result<u64> {
        self.db.generate_id().map_err(unavailable)
    }

    pub async fn flush(&self) -> Result<()> {
        self.db.flush_async().await.map_err(unavailable)?;
        Ok(())
    }
}

/// Opaque wrapper around a storage keyspace/tree.
#[derive(Clone)]
pub struct Tree {
    inner: sled::Tree,
}

impl Tree {
    pub fn get_decoded<K: AsRef<[u8]>, T: DeserializeOwned>(&self, key: K) -> Result<Option<T>> {
        match self.inner.get(key).map_err(unavailable)? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn insert_encoded<K: AsRef<[u8]>, T: Serialize>(&self, key: K, value: &T) -> Result<()> {
        self.inner
            .insert(key.as_ref(), encode(value)?)
            .map_err(unavailable)?;
        Ok(())
    }

    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> Result<bool> {
        self.inner.contains_key(key).map_err(unavailable)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter {
        Iter {
            inner: self.inner.iter(),
        }
    }

    pub fn scan_prefix<P: AsRef<[u8]>>(&self, prefix: P) -> Iter {
        Iter {
            inner: self.inner.scan_prefix(prefix),
        }
    }

    /// Keys under `prefix`, without reading values into records
    pub fn keys_with_prefix<P: AsRef<[u8]>>(&self, prefix: P) -> Result<Vec<Vec<u8>>> {
        self.scan_prefix(prefix)
            .map(|item| item.map(|(k, _)| k))
            .collect()
    }

    /// Apply every write in `batch` atomically
    pub fn apply(&self, batch: WriteBatch) -> Result<()> {
        self.inner.apply_batch(batch.inner).map_err(unavailable)
    }
}

/// Writes staged for one atomic [`Tree::apply`]
#[derive(Default)]
pub struct WriteBatch {
    inner: sled::Batch,
    len: usize,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_encoded<K: AsRef<[u8]>, T: Serialize>(&mut self, key: K, value: &T) -> Result<()> {
        self.inner.insert(key.as_ref(), encode(value)?);
        self.len += 1;
        Ok(())
    }

    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) {
        self.inner.remove(key.as_ref());
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct Iter {
    inner: sled::Iter,
}

impl Iterator for Iter {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(Ok((k, v))) => Some(Ok((k.to_vec(), v.to_vec()))),
            Some(Err(e)) => Some(Err(unavailable(e))),
            None => None,
        }
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| unavailable(format!("encode failed: {}", e)))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| unavailable(format!("corrupt record: {}", e)))
}

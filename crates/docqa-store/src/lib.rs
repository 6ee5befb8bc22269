pub mod similarity;
pub mod storage;
pub mod vector_index;

pub use storage::{Store, Tree, WriteBatch};
pub use vector_index::SledVectorIndex;

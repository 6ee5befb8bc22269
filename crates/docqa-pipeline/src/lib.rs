pub mod answer;
pub mod context;
pub mod retriever;

pub use answer::{Answer, AnswerAssembler, PromptGenerator};
pub use retriever::{IngestFailure, IngestReport, Retriever, RetrieverOptions};
pub use tokio_util::sync::CancellationToken;

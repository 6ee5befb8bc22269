use anyhow::{anyhow, Context, Result};
use docqa_config::{Config, ErrorFormatter};
use docqa_context::{api_key_from_env, select_embedder, select_llm};
use docqa_core::traits::{Embedder, Generator, VectorIndex};
use docqa_pipeline::{AnswerAssembler, PromptGenerator, Retriever, RetrieverOptions};
use docqa_store::SledVectorIndex;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration plus the opened index, shared by every command.
pub struct AppContext {
    pub config: Config,
    pub index: Arc<SledVectorIndex>,
}

impl AppContext {
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let index = SledVectorIndex::from_config(&config.core).with_context(|| {
            format!(
                "failed to open index at {}",
                config.core.index_dir.display()
            )
        })?;
        debug!(
            "opened collection '{}' at {}",
            index.collection(),
            index.path().display()
        );
        Ok(Self {
            config,
            index: Arc::new(index),
        })
    }

    pub fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        let embedding = &self.config.embedding;
        let key = api_key_from_env(embedding.api_key_env());
        Ok(select_embedder(embedding, key)?)
    }

    pub fn generator(&self) -> Result<Arc<dyn Generator>> {
        let llm = &self.config.llm;
        let key = api_key_from_env(llm.api_key_env());
        let client = select_llm(llm, key)?;
        Ok(Arc::new(PromptGenerator::new(client)))
    }

    pub fn retriever(&self) -> Result<Arc<Retriever>> {
        let index: Arc<dyn VectorIndex> = self.index.clone();
        let retriever = Retriever::new(
            self.embedder()?,
            index,
            RetrieverOptions::from_config(&self.config),
        )?;
        Ok(Arc::new(retriever))
    }

    pub fn assembler(&self) -> Result<AnswerAssembler> {
        Ok(AnswerAssembler::new(self.retriever()?, self.generator()?))
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let loaded = match config_path {
        Some(p) => Config::from_file(p),
        None => Config::load(),
    };
    loaded.map_err(|e| anyhow!(ErrorFormatter::new(e).format()))
}

use crate::retriever::Retriever;
use async_trait::async_trait;
use docqa_core::prompt;
use docqa_core::traits::{Generator, LlmClient};
use docqa_core::{Context, Result};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Answer {
    /// Generator output, unmodified
    pub text: String,
    pub context: Context,
}

/// Renders the grounded-answer prompt and sends it to an [`LlmClient`]
pub struct PromptGenerator<L: ?Sized> {
    llm: Arc<L>,
}

impl<L: LlmClient + ?Sized> PromptGenerator<L> {
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl<L: LlmClient + ?Sized> Generator for PromptGenerator<L> {
    async fn generate(&self, question: &str, context: &Context) -> Result<String> {
        let prompt = prompt::render(question, context);
        self.llm.complete(&prompt).await
    }
}

pub struct AnswerAssembler {
    retriever: Arc<Retriever>,
    generator: Arc<dyn Generator>,
}

impl AnswerAssembler {
    pub fn new(retriever: Arc<Retriever>, generator: Arc<dyn Generator>) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    pub fn retriever(&self) -> &Arc<Retriever> {
        &self.retriever
    }

    pub async fn answer_question(&self, question: &str) -> Result<Answer> {
        let options = self.retriever.options();
        self.answer_with(question, options.n_results, options.max_context_length)
            .await
    }

    /// Retrieve, then generate; the generator always sees the retrieved context
    pub async fn answer_with(
        &self,
        question: &str,
        n_results: usize,
        max_context_length: usize,
    ) -> Result<Answer> {
        info!("answering question ({} chars)", question.chars().count());
        let context = self
            .retriever
            .retrieve(question, n_results, max_context_length)
            .await?;
        let text = self.generator.generate(question, &context).await?;
        Ok(Answer { text, context })
    }
}

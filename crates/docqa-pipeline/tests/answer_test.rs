mod common;

use common::{capitals, fixture, small_options, RecordingGenerator, RecordingLlm};
use docqa_core::prompt::NO_CONTEXT_NOTICE;
use docqa_core::RagError;
use docqa_pipeline::{AnswerAssembler, CancellationToken, PromptGenerator};
use std::sync::Arc;

#[tokio::test]
async fn generator_sees_retrieved_context() {
    let fx = fixture(small_options());
    fx.retriever
        .ingest_documents(&capitals(), &CancellationToken::new())
        .await
        .unwrap();

    let generator = Arc::new(RecordingGenerator::default());
    let assembler = AnswerAssembler::new(fx.retriever.clone(), generator.clone());
    let answer = assembler
        .answer_question("What is the capital of France?")
        .await
        .unwrap();

    assert_eq!(answer.text, "answer from 2 sources");
    assert_eq!(answer.context.sources[0].document_id, "paris.txt");

    let seen = generator.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "What is the capital of France?");
    assert_eq!(seen[0].1, answer.context);
}

#[tokio::test]
async fn empty_index_still_generates() {
    let fx = fixture(small_options());
    let generator = Arc::new(RecordingGenerator::default());
    let assembler = AnswerAssembler::new(fx.retriever.clone(), generator.clone());

    let answer = assembler.answer_question("Tell me about AI investments").await.unwrap();
    assert!(answer.context.is_empty());
    assert_eq!(answer.text, "answer from 0 sources");
}

#[tokio::test]
async fn empty_question_never_reaches_generator() {
    let fx = fixture(small_options());
    let generator = Arc::new(RecordingGenerator::default());
    let assembler = AnswerAssembler::new(fx.retriever.clone(), generator.clone());

    let result = assembler.answer_question("  ").await;
    assert!(matches!(result, Err(RagError::EmptyQuery)));
    assert!(generator.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn prompt_generator_renders_template_and_passes_text_through() {
    let fx = fixture(small_options());
    let llm = Arc::new(RecordingLlm::default());
    let assembler = AnswerAssembler::new(
        fx.retriever.clone(),
        Arc::new(PromptGenerator::new(llm.clone())),
    );

    let answer = assembler.answer_question("What is ChatGPT?").await.unwrap();
    assert_eq!(answer.text, "  generated text, kept verbatim  ");

    let prompts = llm.prompts.lock().unwrap();
    assert!(prompts[0].contains(NO_CONTEXT_NOTICE));
    assert!(prompts[0].contains("Question: What is ChatGPT?"));
}

#[tokio::test]
async fn prompt_includes_context_text() {
    let fx = fixture(small_options());
    fx.retriever
        .ingest_documents(&capitals(), &CancellationToken::new())
        .await
        .unwrap();
    let llm = Arc::new(RecordingLlm::default());
    let assembler = AnswerAssembler::new(
        fx.retriever.clone(),
        Arc::new(PromptGenerator::new(llm.clone())),
    );

    assembler.answer_with("capital of Germany?", 1, 4000).await.unwrap();
    let prompts = llm.prompts.lock().unwrap();
    assert!(prompts[0].contains("Context:\nBerlin is the capital of Germany\n"));
}

//! Prompt template for grounded answers

use crate::models::Context;

pub const NO_CONTEXT_NOTICE: &str = "No relevant context was found in the indexed documents.";

pub fn render(question: &str, context: &Context) -> String {
    let context_text = if context.is_empty() {
        NO_CONTEXT_NOTICE
    } else {
        context.text.as_str()
    };

    format!(
        "Based on the following context information, please answer the user's question. \
If the answer is not found in the context, please say so clearly.\n\
\n\
Context:\n\
{context_text}\n\
\n\
Question: {question}\n\
\n\
Please provide a comprehensive and accurate answer based only on the information provided \
in the context. If you need to make any inferences, please make it clear that you are doing so."
    )
}

//! Joins ranked chunks into a bounded context string

use docqa_core::{Context, ContextSource, QueryMatch};

pub const DELIMITER: &str = "\n\n";

/// Take matches in rank order until the next one would push the context past
/// `max_chars`. Chunks are never cut; the first chunk that does not fit ends
/// assembly.
pub fn assemble(matches: &[QueryMatch], max_chars: usize) -> Context {
    let delimiter_len = DELIMITER.chars().count();
    let mut context = Context::empty();
    let mut used = 0;

    for (i, m) in matches.iter().enumerate() {
        let len = m.text.chars().count();
        let needed = if context.sources.is_empty() {
            len
        } else {
            len + delimiter_len
        };
        if used + needed > max_chars {
            context.omitted = matches.len() - i;
            break;
        }
        if !context.sources.is_empty() {
            context.text.push_str(DELIMITER);
        }
        context.text.push_str(&m.text);
        context.sources.push(ContextSource {
            document_id: m.document_id().to_string(),
            chunk_index: m.metadata.chunk_index,
            score: m.score,
        });
        used += needed;
    }

    context
}

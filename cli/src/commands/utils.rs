use docqa_core::Context;
use termimad::{FmtText, MadSkin};

pub fn render_markdown_answer(text: &str) -> String {
    let skin = MadSkin::default();
    let (w, _) = termimad::terminal_size();
    let width = std::cmp::max(20, w.saturating_sub(4) as usize);
    FmtText::from(&skin, text, Some(width)).to_string()
}

/// One line per source, in rank order
pub fn format_sources(context: &Context) -> String {
    if context.is_empty() {
        return "No relevant documents found.".to_string();
    }
    let mut out = String::new();
    for (i, source) in context.sources.iter().enumerate() {
        out.push_str(&format!(
            "#{} {} (chunk {}, score {:.3})\n",
            i + 1,
            source.document_id,
            source.chunk_index,
            source.score
        ));
    }
    if context.omitted > 0 {
        out.push_str(&format!(
            "{} more match(es) did not fit the context budget\n",
            context.omitted
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::ContextSource;

    #[test]
    fn test_format_sources_lists_rank_and_score() {
        let context = Context {
            text: "a\n\nb".into(),
            sources: vec![
                ContextSource {
                    document_id: "ai.txt".into(),
                    chunk_index: 2,
                    score: 0.9,
                },
                ContextSource {
                    document_id: "news.txt".into(),
                    chunk_index: 0,
                    score: 0.5,
                },
            ],
            omitted: 1,
        };
        let out = format_sources(&context);
        assert!(out.starts_with("#1 ai.txt (chunk 2, score 0.900)"));
        assert!(out.contains("#2 news.txt (chunk 0, score 0.500)"));
        assert!(out.contains("1 more match(es)"));
    }

    #[test]
    fn test_format_sources_empty_context() {
        assert_eq!(
            format_sources(&Context::empty()),
            "No relevant documents found."
        );
    }
}

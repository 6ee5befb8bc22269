use docqa_core::chunking::split;
use docqa_core::RagError;

/// Rebuild the text from each chunk's leading `stride` chars plus the whole last chunk
fn reconstruct(text: &str, size: usize, overlap: usize) -> String {
    let chunks = split(text, size, overlap).unwrap();
    let stride = size - overlap;
    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i + 1 == chunks.len() {
            out.push_str(&chunk.text);
        } else {
            out.extend(chunk.text.chars().take(stride));
        }
    }
    out
}

#[test]
fn reconstructs_original_text() {
    let long = "lorem ipsum dolor sit amet ".repeat(40);
    let texts: [&str; 5] = [
        "",
        "a",
        "The quick brown fox jumps over the lazy dog.",
        "Überraschung! 日本語のテキストも分割できる。 emoji 🦀🦀🦀 end",
        long.as_str(),
    ];
    let params = [(1, 0), (2, 1), (5, 0), (10, 3), (16, 15), (100, 20), (2000, 10)];

    for text in texts {
        for (size, overlap) in params {
            assert_eq!(
                reconstruct(text, size, overlap),
                text,
                "size={size} overlap={overlap}"
            );
        }
    }
}

#[test]
fn consecutive_chunks_advance_by_stride() {
    let text = "abcdefghijklmnopqrstuvwxyz".repeat(3);
    let chunks = split(&text, 12, 4).unwrap();
    for pair in chunks.windows(2) {
        assert_eq!(pair[1].start - pair[0].start, 8);
    }
    let last = chunks.last().unwrap();
    assert_eq!(last.end, text.chars().count());
    assert!(!last.text.is_empty());
    assert!(chunks.iter().all(|c| c.text.chars().count() <= 12));
}

#[test]
fn rejects_bad_parameters_before_work() {
    assert!(matches!(split("", 0, 0), Err(RagError::InvalidParameter { .. })));
    assert!(matches!(split("", 4, 7), Err(RagError::InvalidParameter { .. })));
}

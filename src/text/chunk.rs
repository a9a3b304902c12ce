// Word-window chunking. Every downstream aggregator (sentiment, topics,
// summarization) operates on these windows in order.

/// Split `text` into consecutive windows of `chunk_size` words, joined
/// back with single spaces. The final window may be shorter. Whitespace
/// runs are treated as single separators, so joining the returned chunks
/// with " " reproduces the word sequence of the input.
///
/// # Panics
///
/// Panics if `chunk_size` is zero. Configuration validation rejects a
/// zero chunk size before any caller can reach this.
pub fn chunk(text: &str, chunk_size: usize) -> Vec<String> {
    assert!(chunk_size > 0, "chunk_size must be at least 1");

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    words.chunks(chunk_size).map(|w| w.join(" ")).collect()
}

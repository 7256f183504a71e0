//! Greedy transcript chunking
//!
//! Packs conversation lines into chunks under an approximate token budget so
//! each provider call stays within the model's context. A single line over
//! budget falls back to character slicing.

/// Rough characters-per-token estimate used for the character fallback
pub const CHARS_PER_TOKEN: usize = 4;

/// Split a transcript into chunks of at most `max_tokens` apiece.
///
/// Tokens are approximated as whitespace-separated words. Lines are never
/// reordered; a chunk is flushed when the next line would overflow it. A
/// line that alone exceeds the budget is sliced at
/// `max_tokens * CHARS_PER_TOKEN` characters.
pub fn chunk_transcript(text: &str, max_tokens: usize) -> Vec<String> {
    let max_tokens = max_tokens.max(1);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_tokens = 0usize;

    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let line_tokens = approx_tokens(line);

        if line_tokens > max_tokens {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_tokens = 0;
            }
            chunks.extend(slice_by_chars(line, max_tokens * CHARS_PER_TOKEN));
            continue;
        }

        if current_tokens + line_tokens > max_tokens && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_tokens = 0;
        }

        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        current_tokens += line_tokens;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn approx_tokens(line: &str) -> usize {
    line.split_whitespace().count()
}

fn slice_by_chars(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = line.chars().collect();

    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}

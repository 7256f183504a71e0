//! Extractive fallback summary
//!
//! When no LLM provider is configured or a provider call fails, the summary
//! degrades to the leading sentences of the conversation within a character
//! budget. This never fails.

/// Take the leading sentences of `text` that fit within `max_chars`.
///
/// Falls back to a plain character truncation when even the first sentence
/// is over budget.
pub fn extractive_summary(text: &str, max_chars: usize) -> String {
    let max_chars = max_chars.max(1);
    let text = text.trim();

    let mut out = String::new();
    let mut out_chars = 0usize;

    for sentence in sentences(text) {
        let sentence_chars = sentence.chars().count();
        let sep = usize::from(!out.is_empty());

        if out_chars + sep + sentence_chars > max_chars {
            break;
        }

        if sep == 1 {
            out.push(' ');
        }
        out.push_str(sentence);
        out_chars += sep + sentence_chars;
    }

    if out.is_empty() && !text.is_empty() {
        let truncated: String = text.chars().take(max_chars).collect();
        out = format!("{}...", truncated.trim_end());
    }

    out
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

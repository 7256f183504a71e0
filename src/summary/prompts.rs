/// Build a deterministic prompt for summarizing a whole conversation.
pub fn conversation_prompt(transcript: &str) -> String {
    format!(
        "You are an assistant that writes concise, factual summaries of spoken conversations.\n\
\n\
Write a short paragraph describing what was discussed, followed by a bullet\n\
list of the key points. Rules:\n\
- Use only information present in the transcript.\n\
- Refer to participants by their speaker labels.\n\
- Keep each bullet short and concrete.\n\
\n\
Transcript:\n\
{transcript}"
    )
}

/// Prompt for one chunk of a conversation too long for a single call.
pub fn chunk_prompt(index: usize, total: usize, transcript: &str) -> String {
    format!(
        "You are summarizing part {index} of {total} of a longer conversation.\n\
Write 2-4 sentences covering what is discussed in this part only.\n\
Use only information present in the transcript excerpt.\n\
\n\
Transcript excerpt:\n\
{transcript}"
    )
}

/// Prompt that merges per-chunk summaries into one.
pub fn combine_prompt(partials: &[String]) -> String {
    format!(
        "Below are summaries of consecutive parts of one conversation.\n\
Merge them into a single coherent summary: a short paragraph followed by a\n\
bullet list of the key points. Do not repeat yourself.\n\
\n\
Part summaries:\n\
{}",
        partials.join("\n\n")
    )
}

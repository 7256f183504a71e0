//! HTML rendering for the web UI
//!
//! Plain string templates; the UI is a single form and a results page.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::config::Settings;
use crate::pipeline::ProcessOutcome;
use crate::summary::SummarySource;

const STYLE: &str = "\
body { font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; color: #222; }\n\
h1 { font-size: 1.6rem; }\n\
form.upload { border: 1px solid #ccc; border-radius: 8px; padding: 1rem 1.5rem; }\n\
label { display: block; margin: 0.8rem 0 0.3rem; font-weight: bold; }\n\
button { margin-top: 1rem; padding: 0.5rem 1.5rem; }\n\
pre.conversation { background: #f6f6f6; padding: 1rem; border-radius: 8px; white-space: pre-wrap; }\n\
div.summary { background: #eef6ee; padding: 1rem; border-radius: 8px; white-space: pre-wrap; }\n\
p.note { color: #8a6d3b; background: #fcf8e3; padding: 0.5rem 1rem; border-radius: 6px; }\n\
p.error { color: #a94442; background: #f2dede; padding: 0.5rem 1rem; border-radius: 6px; }\n";

/// Render the upload form.
pub fn index_page(settings: &Settings) -> String {
    let mut speaker_options = String::new();
    for n in 1..=settings.diarization.max_speakers {
        let selected = if n == settings.diarization.default_speakers {
            " selected"
        } else {
            ""
        };
        speaker_options.push_str(&format!("<option value=\"{n}\"{selected}>{n}</option>"));
    }

    let diarization_control = if settings.diarization.enabled {
        "<label for=\"diarize\">Enable Diarization</label>\n\
         <input type=\"checkbox\" id=\"diarize\" name=\"diarize\" checked>"
            .to_string()
    } else {
        String::new()
    };

    let api_key_note = if settings.resolve_api_key().is_none() {
        "<p class=\"note\">No summarizer API key is configured. Summaries will be \
         extractive excerpts of the conversation.</p>"
    } else {
        ""
    };

    page(
        "Speech-to-Text with Speaker Diarization",
        &format!(
            "<p>Transcribe audio, attribute speakers, and summarize the conversation.</p>\n\
             {api_key_note}\n\
             <form class=\"upload\" action=\"/process\" method=\"post\" enctype=\"multipart/form-data\">\n\
             <label for=\"audio\">Upload an audio file (wav, mp3, m4a, ogg, flac)</label>\n\
             <input type=\"file\" id=\"audio\" name=\"audio\" accept=\".wav,.mp3,.m4a,.ogg,.flac\" required>\n\
             <label for=\"speakers\">Number of Speakers</label>\n\
             <select id=\"speakers\" name=\"speakers\">{speaker_options}</select>\n\
             {diarization_control}\n\
             <br><button type=\"submit\">Process</button>\n\
             </form>"
        ),
    )
}

/// Render the results of a processing run.
pub fn results_page(filename: &str, outcome: &ProcessOutcome) -> String {
    let mut notes = String::new();
    for note in &outcome.notes {
        notes.push_str(&format!("<p class=\"note\">{}</p>\n", escape_html(note)));
    }

    let summary_heading = match outcome.summary_source {
        SummarySource::Provider => "Summary",
        SummarySource::Extractive => "Summary (extract)",
    };

    let summary_block = if outcome.summary.is_empty() {
        "<p>No summary available.</p>".to_string()
    } else {
        format!(
            "<div class=\"summary\">{}</div>\n{}",
            escape_html(&outcome.summary),
            download_form("summary.txt", &outcome.summary, "Download Summary"),
        )
    };

    page(
        &format!("Results for {}", escape_html(filename)),
        &format!(
            "{notes}\
             <h2>{summary_heading}</h2>\n\
             {summary_block}\n\
             <h2>Conversation</h2>\n\
             <pre class=\"conversation\">{conversation}</pre>\n\
             {conversation_download}\n\
             <p><a href=\"/\">Process another file</a></p>",
            conversation = escape_html(&outcome.conversation),
            conversation_download = download_form(
                "conversation.txt",
                &outcome.conversation,
                "Download Conversation"
            ),
        ),
    )
}

/// Render an error page with the given status.
pub fn error_page(status: StatusCode, message: &str) -> Response {
    let body = page(
        "Something went wrong",
        &format!(
            "<p class=\"error\">{}</p>\n<p><a href=\"/\">Back</a></p>",
            escape_html(message)
        ),
    );

    (status, Html(body)).into_response()
}

fn download_form(filename: &str, content: &str, label: &str) -> String {
    format!(
        "<form action=\"/download\" method=\"post\">\n\
         <input type=\"hidden\" name=\"filename\" value=\"{}\">\n\
         <input type=\"hidden\" name=\"content\" value=\"{}\">\n\
         <button type=\"submit\">{}</button>\n\
         </form>",
        escape_html(filename),
        escape_html(content),
        escape_html(label),
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         {body}\n\
         </body>\n\
         </html>"
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

//! HTTP handlers for the upload form, processing, and downloads

use std::sync::Arc;

use axum::extract::{Form, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::audio;
use crate::pipeline::{ProcessRequest, Processor};
use crate::web::templates;

/// Render the upload form.
pub async fn index(State(processor): State<Arc<Processor>>) -> Html<String> {
    Html(templates::index_page(processor.settings()))
}

/// Handle a form submission: decode, process, render results.
pub async fn process(
    State(processor): State<Arc<Processor>>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut num_speakers = processor.settings().diarization.default_speakers;
    let mut diarize = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return templates::error_page(
                    StatusCode::BAD_REQUEST,
                    &format!("Malformed upload: {}", e),
                );
            }
        };

        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "audio" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                    Err(e) => {
                        return templates::error_page(
                            StatusCode::BAD_REQUEST,
                            &format!("Failed to read upload: {}", e),
                        );
                    }
                }
            }
            "speakers" => {
                if let Ok(text) = field.text().await {
                    if let Ok(n) = text.trim().parse::<usize>() {
                        num_speakers = n;
                    }
                }
            }
            "diarize" => {
                // Checkboxes are only submitted when checked
                diarize = true;
            }
            _ => {}
        }
    }

    let (filename, bytes) = match upload {
        Some((filename, bytes)) if !bytes.is_empty() => (filename, bytes),
        _ => {
            return templates::error_page(
                StatusCode::BAD_REQUEST,
                "Please upload an audio file to get started.",
            );
        }
    };

    if !audio::is_supported_format(&filename) {
        return templates::error_page(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            &format!("Unsupported file type: {}", filename),
        );
    }

    let settings = processor.settings();
    num_speakers = num_speakers.clamp(1, settings.diarization.max_speakers);
    diarize = diarize && settings.diarization.enabled;

    tracing::info!(
        "Processing {} ({} bytes, {} speakers, diarization {})",
        filename,
        bytes.len(),
        num_speakers,
        if diarize { "on" } else { "off" }
    );

    let samples = match audio::decode_upload(&bytes, &filename) {
        Ok(samples) => samples,
        Err(e) => {
            return templates::error_page(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("Could not decode audio: {}", e),
            );
        }
    };

    let outcome = match processor
        .process(ProcessRequest {
            samples,
            num_speakers,
            diarize,
        })
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Processing failed: {:#}", e);
            return templates::error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Processing failed: {}", e),
            );
        }
    };

    Html(templates::results_page(&filename, &outcome)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub filename: String,
    pub content: String,
}

/// Echo submitted text back as a plain-text attachment.
///
/// The results page posts its own content here, which keeps the server free
/// of any per-request state.
pub async fn download(Form(form): Form<DownloadForm>) -> Response {
    let filename = sanitize_filename(&form.filename);

    (
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        form.content,
    )
        .into_response()
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if cleaned.is_empty() {
        "download.txt".to_string()
    } else {
        cleaned
    }
}

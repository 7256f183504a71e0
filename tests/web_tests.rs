use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::util::ServiceExt;

use colloquy::config::Settings;
use colloquy::pipeline::Processor;
use colloquy::web::router;

const MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;

fn test_settings() -> Settings {
    // Point model lookups at an empty directory so tests never depend on
    // whatever is installed on the machine.
    let dir = tempfile::tempdir().expect("tempdir").into_path();
    let mut settings = Settings::default();
    settings.whisper.models_dir = dir.clone();
    settings.general.data_dir = dir;
    settings
}

fn test_app() -> axum::Router {
    router(Arc::new(Processor::new(test_settings())), MAX_UPLOAD_BYTES)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8_lossy(&bytes).to_string()
}

fn multipart_request(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    let boundary = "colloquy-test-boundary";
    let mut body: Vec<u8> = Vec::new();

    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/process")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("build request")
}

fn wav_bytes() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for _ in 0..16_000 {
            writer.write_sample(0i16).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

#[tokio::test]
async fn index_renders_upload_form() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("multipart/form-data"));
    assert!(body.contains("name=\"audio\""));
    assert!(body.contains("name=\"speakers\""));
    assert!(body.contains("Process"));
}

#[tokio::test]
async fn process_without_file_is_rejected() {
    let request = multipart_request(&[("speakers", None, b"2")]);

    let response = test_app().oneshot(request).await.expect("request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("upload an audio file"));
}

#[tokio::test]
async fn process_rejects_unknown_file_types() {
    let request = multipart_request(&[("audio", Some("notes.txt"), b"hello")]);

    let response = test_app().oneshot(request).await.expect("request");

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn process_without_models_reports_failure() {
    let wav = wav_bytes();
    let request = multipart_request(&[
        ("audio", Some("meeting.wav"), &wav),
        ("speakers", None, b"2"),
    ]);

    let response = test_app().oneshot(request).await.expect("request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(response).await;
    assert!(body.contains("Processing failed"));
}

#[tokio::test]
async fn download_echoes_content_as_attachment() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/download")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from(
                    "filename=summary.txt&content=Speaker+1%3A+Hello",
                ))
                .expect("build request"),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .expect("content disposition")
        .to_str()
        .expect("header value")
        .to_string();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("summary.txt"));

    let body = body_string(response).await;
    assert_eq!(body, "Speaker 1: Hello");
}

#[tokio::test]
async fn download_sanitizes_hostile_filenames() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/download")
                .header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(Body::from("filename=..%2F..%2Fetc%2Fpasswd&content=x"))
                .expect("build request"),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);

    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .expect("content disposition")
        .to_str()
        .expect("header value")
        .to_string();
    assert!(!disposition.contains('/'));
}

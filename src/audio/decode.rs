//! Audio file decoding
//!
//! WAV files are decoded in-process with hound. Everything else (mp3, m4a,
//! ogg, flac) is handed to ffmpeg, which writes raw f32 PCM to stdout.

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::audio::SAMPLE_RATE;
use crate::{ColloquyError, Result};

/// File extensions accepted by the upload form and the CLI
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "flac"];

/// Check whether a filename has a supported audio extension
pub fn is_supported_format(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Decode an uploaded byte buffer into 16 kHz mono f32 samples.
///
/// The filename is only used to pick the decoder. Non-WAV uploads are
/// spooled to a temporary file so ffmpeg can read them.
pub fn decode_upload(bytes: &[u8], filename: &str) -> Result<Vec<f32>> {
    let ext = extension_of(filename).ok_or_else(|| {
        ColloquyError::Audio(format!("File has no extension: {}", filename))
    })?;

    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ColloquyError::Audio(format!(
            "Unsupported audio format '{}'. Supported: {}",
            ext,
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    if ext == "wav" {
        return decode_wav_bytes(bytes);
    }

    let mut temp = tempfile::Builder::new()
        .suffix(&format!(".{}", ext))
        .tempfile()?;
    temp.write_all(bytes)?;
    temp.flush()?;

    decode_with_ffmpeg(temp.path())
}

/// Decode an audio file from disk into 16 kHz mono f32 samples
pub fn decode_file(path: &Path) -> Result<Vec<f32>> {
    if !path.exists() {
        return Err(ColloquyError::Audio(format!(
            "Audio file does not exist: {}",
            path.display()
        )));
    }

    match extension_of(&path.to_string_lossy()).as_deref() {
        Some("wav") => {
            let bytes = std::fs::read(path)?;
            decode_wav_bytes(&bytes)
        }
        Some(ext) if SUPPORTED_EXTENSIONS.contains(&ext) => decode_with_ffmpeg(path),
        other => Err(ColloquyError::Audio(format!(
            "Unsupported audio format '{}'. Supported: {}",
            other.unwrap_or("none"),
            SUPPORTED_EXTENSIONS.join(", ")
        ))),
    }
}

/// Decode WAV bytes with hound and convert to f32 samples at 16 kHz mono
pub fn decode_wav_bytes(bytes: &[u8]) -> Result<Vec<f32>> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| ColloquyError::Audio(format!("Failed to parse WAV data: {}", e)))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    tracing::debug!(
        "Decoding WAV: {} Hz, {} channels, {:?}",
        sample_rate,
        channels,
        spec.sample_format
    );

    // Read samples based on format
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 32768.0)
            .collect(),
        (hound::SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 2147483648.0)
            .collect(),
        (hound::SampleFormat::Float, 32) => {
            reader.into_samples::<f32>().filter_map(|s| s.ok()).collect()
        }
        _ => {
            return Err(ColloquyError::Audio(format!(
                "Unsupported WAV format: {:?} {}bit",
                spec.sample_format, spec.bits_per_sample
            )))
        }
    };

    // Convert to mono if stereo
    let samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    // Resample to 16kHz if needed
    let samples = if sample_rate != SAMPLE_RATE {
        resample(&samples, sample_rate, SAMPLE_RATE)
    } else {
        samples
    };

    Ok(samples)
}

/// Decode any format ffmpeg understands to raw f32 PCM at 16 kHz mono
fn decode_with_ffmpeg(path: &Path) -> Result<Vec<f32>> {
    tracing::debug!("Decoding {} with ffmpeg", path.display());

    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(path)
        .arg("-f")
        .arg("f32le")
        .arg("-acodec")
        .arg("pcm_f32le")
        .arg("-ar")
        .arg(SAMPLE_RATE.to_string())
        .arg("-ac")
        .arg("1")
        .arg("-")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            ColloquyError::Audio(format!(
                "Failed to run ffmpeg (is it installed?): {}",
                e
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.lines().last().unwrap_or("unknown error");
        return Err(ColloquyError::Audio(format!(
            "ffmpeg failed to decode {}: {}",
            path.display(),
            detail
        )));
    }

    let samples: Vec<f32> = output
        .stdout
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    if samples.is_empty() {
        return Err(ColloquyError::Audio(format!(
            "ffmpeg produced no audio from {}",
            path.display()
        )));
    }

    Ok(samples)
}

/// Simple linear resampling
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio) as usize;
    let mut result = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f64;

        let sample = if src_idx + 1 < samples.len() {
            samples[src_idx] * (1.0 - frac as f32) + samples[src_idx + 1] * frac as f32
        } else if src_idx < samples.len() {
            samples[src_idx]
        } else {
            0.0
        };

        result.push(sample);
    }

    result
}

/// Convert f32 samples to the i16 range the diarization models use
pub fn to_i16_samples(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
            for &s in samples {
                writer.write_sample(s).expect("write sample");
            }
            writer.finalize().expect("finalize wav");
        }
        cursor.into_inner()
    }

    #[test]
    fn decodes_16k_mono_wav_unchanged() {
        let bytes = wav_bytes(16_000, 1, &[0, 16384, -16384, 0]);
        let samples = decode_wav_bytes(&bytes).expect("decode");
        assert_eq!(samples.len(), 4);
        assert!((samples[1] - 0.5).abs() < 0.001);
    }

    #[test]
    fn stereo_wav_is_downmixed() {
        // Left and right cancel out to silence
        let bytes = wav_bytes(16_000, 2, &[16384, -16384, 16384, -16384]);
        let samples = decode_wav_bytes(&bytes).expect("decode");
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.abs() < 0.001));
    }

    #[test]
    fn high_sample_rate_wav_is_resampled() {
        let bytes = wav_bytes(32_000, 1, &vec![100; 32_000]);
        let samples = decode_wav_bytes(&bytes).expect("decode");
        // One second of audio should come out near 16k samples
        assert!((samples.len() as i64 - 16_000).abs() < 10);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = decode_upload(b"not audio", "notes.txt").unwrap_err();
        assert!(err.to_string().contains("Unsupported audio format"));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = decode_upload(b"not audio", "audio").unwrap_err();
        assert!(err.to_string().contains("no extension"));
    }

    #[test]
    fn supported_format_detection_is_case_insensitive() {
        assert!(is_supported_format("meeting.WAV"));
        assert!(is_supported_format("call.mp3"));
        assert!(!is_supported_format("notes.txt"));
    }

    #[test]
    fn i16_conversion_clamps_out_of_range() {
        let samples = to_i16_samples(&[0.0, 1.5, -1.5]);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[1], 32767);
        assert_eq!(samples[2], -32768);
    }
}

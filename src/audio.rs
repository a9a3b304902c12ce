use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{AudiogistError, Result};

/// File extensions the preparation step accepts as input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "m4a", "flac", "ogg", "opus", "aac", "mp4", "mkv", "webm", "mov", "avi",
];

/// Metadata about a prepared audio file.
#[derive(Debug, Clone)]
pub struct AudioMetadata {
    pub duration: Duration,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Check if FFmpeg is installed and accessible.
pub fn check_ffmpeg() -> Result<()> {
    let output = Command::new("ffmpeg").arg("-version").output().map_err(|e| {
        AudiogistError::DecoderMissing(format!(
            "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(AudiogistError::DecoderMissing(
            "FFmpeg check failed".to_string(),
        ));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Check if FFprobe is installed and accessible.
pub fn check_ffprobe() -> Result<()> {
    let output = Command::new("ffprobe").arg("-version").output().map_err(|e| {
        AudiogistError::DecoderMissing(format!(
            "FFprobe not found. Please install FFmpeg (includes FFprobe). Error: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(AudiogistError::DecoderMissing(
            "FFprobe check failed".to_string(),
        ));
    }

    debug!("FFprobe is available");
    Ok(())
}

/// Get audio duration using FFprobe.
pub fn probe_duration(input: &Path) -> Result<Duration> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|e| AudiogistError::AudioPreparation(format!("Failed to run FFprobe: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AudiogistError::AudioPreparation(format!(
            "FFprobe failed: {stderr}"
        )));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str.trim().parse().map_err(|e| {
        AudiogistError::AudioPreparation(format!(
            "Failed to parse duration '{}': {e}",
            duration_str.trim()
        ))
    })?;

    Ok(Duration::from_secs_f64(duration_secs))
}

pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// A WAV that already matches the conversion target needs no FFmpeg pass.
fn conversion_target_spec(path: &Path) -> Option<hound::WavSpec> {
    let is_wav = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("wav"))
        .unwrap_or(false);
    if !is_wav {
        return None;
    }

    let reader = hound::WavReader::open(path).ok()?;
    let spec = reader.spec();
    (spec.channels == 1
        && spec.sample_rate == 16_000
        && spec.bits_per_sample == 16
        && spec.sample_format == hound::SampleFormat::Int)
        .then_some(spec)
}

/// Prepare an input file for transcription.
///
/// Converts audio or video input to mono 16-bit PCM at 16kHz, writing the
/// result into `work_dir`. A WAV that already has that shape is returned
/// as-is without conversion.
pub async fn prepare_audio(input: &Path, work_dir: &Path) -> Result<(PathBuf, AudioMetadata)> {
    check_ffmpeg()?;
    check_ffprobe()?;

    if !input.exists() {
        return Err(AudiogistError::FileNotFound(input.display().to_string()));
    }

    let duration = probe_duration(input)?;
    debug!("Input duration: {:?}", duration);

    if let Some(spec) = conversion_target_spec(input) {
        info!("Input is already mono 16kHz PCM, skipping conversion");
        return Ok((
            input.to_path_buf(),
            AudioMetadata {
                duration,
                sample_rate: spec.sample_rate,
                channels: spec.channels,
            },
        ));
    }

    let output = work_dir.join("prepared.wav");
    info!("Converting {} for transcription", input.display());

    let status = Command::new("ffmpeg")
        .args(["-y", "-i"])
        .arg(input)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1"])
        .arg(&output)
        .status()
        .map_err(|e| AudiogistError::AudioPreparation(format!("Failed to run FFmpeg: {e}")))?;

    if !status.success() {
        return Err(AudiogistError::AudioPreparation(
            "FFmpeg audio conversion failed".to_string(),
        ));
    }

    if !output.exists() {
        return Err(AudiogistError::AudioPreparation(
            "Output file was not created".to_string(),
        ));
    }

    info!("Audio prepared at {}", output.display());

    Ok((
        output,
        AudioMetadata {
            duration,
            sample_rate: 16000,
            channels: 1,
        },
    ))
}

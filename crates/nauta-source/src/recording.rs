use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};

use nauta_core::error::SourceError;
use nauta_core::traits::AudioSource;

use crate::wav::decode_wav;

/// A monitoring recording loaded from a WAV file.
///
/// The filename carries the deployment metadata in the
/// `DEVICEID_YYYYMMDD_HHMMSS.wav` convention used by autonomous recorders;
/// the start timestamp is parsed from it and the end timestamp follows from
/// the decoded duration.
pub struct WavRecording {
    /// File name without directory.
    pub filename: String,
    /// Directory the file was loaded from.
    pub directory: PathBuf,
    /// Recorder identifier from the filename prefix.
    pub device_id: String,
    /// Recording start, from the filename.
    pub start: NaiveDateTime,
    /// Recording end: start plus decoded duration.
    pub end: NaiveDateTime,
    /// Duration in seconds.
    pub duration: f64,
    samples: Vec<f32>,
    sample_rate: u32,
}

impl WavRecording {
    /// Load channel 0 of a WAV file.
    ///
    /// # Errors
    /// Returns an error if the path is not a `.wav` file, the filename does
    /// not match the metadata pattern, or decoding fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_channel(path, 0)
    }

    /// Load one channel of a WAV file.
    ///
    /// # Errors
    /// Same as [`WavRecording::open`], plus a channel-out-of-range error.
    pub fn open_channel(path: impl AsRef<Path>, channel: usize) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("wav") {
            return Err(SourceError::NotWav {
                path: path.display().to_string(),
            }
            .into());
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Invalid file name: {}", path.display()))?
            .to_owned();
        let (device_id, start) = parse_wav_filename(&filename)?;

        let (samples, sample_rate) = decode_wav(path, channel)?;
        let duration = samples.len() as f64 / f64::from(sample_rate);
        let end = start + Duration::milliseconds((duration * 1000.0).round() as i64);

        log::info!("Loaded {filename}: device {device_id}, start {start}, {duration:.1}s");

        Ok(Self {
            filename,
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            device_id,
            start,
            end,
            duration,
            samples,
            sample_rate,
        })
    }
}

impl AudioSource for WavRecording {
    fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// An in-memory recording with no file or metadata attached.
///
/// # Example
/// ```
/// use nauta_core::traits::AudioSource;
/// use nauta_source::recording::RawRecording;
/// let rec = RawRecording::new(vec![0.0; 48_000], 48_000);
/// assert_eq!(rec.duration(), 1.0);
/// ```
pub struct RawRecording {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl RawRecording {
    /// Wrap a sample buffer and its rate.
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }
}

impl AudioSource for RawRecording {
    fn samples(&self) -> &[f32] {
        &self.samples
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Extract `(device_id, start)` from a `DEVICEID_YYYYMMDD_HHMMSS...` name.
///
/// The device id is alphanumeric; trailing segments after the time are
/// tolerated (some recorders append sequence numbers).
///
/// # Errors
/// Returns [`SourceError::FilenamePattern`] if the name does not match.
pub fn parse_wav_filename(filename: &str) -> Result<(String, NaiveDateTime), SourceError> {
    let mismatch = || SourceError::FilenamePattern {
        filename: filename.to_owned(),
    };

    let stem = filename.strip_suffix(".wav").unwrap_or(filename);
    let mut parts = stem.split('_');
    let device_id = parts.next().ok_or_else(mismatch)?;
    let date = parts.next().ok_or_else(mismatch)?;
    let time = parts.next().ok_or_else(mismatch)?;

    let time_ok = time.len() >= 6 && time.as_bytes()[..6].iter().all(u8::is_ascii_digit);
    if device_id.is_empty()
        || !device_id.bytes().all(|b| b.is_ascii_alphanumeric())
        || date.len() != 8
        || !date.bytes().all(|b| b.is_ascii_digit())
        || !time_ok
    {
        return Err(mismatch());
    }

    let start = NaiveDateTime::parse_from_str(&format!("{date} {}", &time[..6]), "%Y%m%d %H%M%S")
        .map_err(|_| mismatch())?;
    Ok((device_id.to_owned(), start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_filename() {
        let (device, start) = parse_wav_filename("SM4_20240301_120000.wav").unwrap();
        assert_eq!(device, "SM4");
        assert_eq!(start.to_string(), "2024-03-01 12:00:00");
    }

    #[test]
    fn tolerates_trailing_segments() {
        let (device, start) = parse_wav_filename("AMAR999_20231115_063000_001.wav").unwrap();
        assert_eq!(device, "AMAR999");
        assert_eq!(start.to_string(), "2023-11-15 06:30:00");
    }

    #[test]
    fn rejects_malformed_names() {
        for name in [
            "nodate.wav",
            "SM4_2024_120000.wav",        // short date
            "SM4_20240301_12.wav",        // short time
            "SM4_20241301_120000.wav",    // month 13
            "_20240301_120000.wav",       // empty device id
            "SM-4_20240301_120000.wav",   // non-alphanumeric device id
            "SM4_2024030a_120000.wav",    // letter in date
        ] {
            assert!(
                parse_wav_filename(name).is_err(),
                "'{name}' should be rejected"
            );
        }
    }

    #[test]
    fn raw_recording_exposes_the_contract() {
        let rec = RawRecording::new(vec![0.5; 2000], 1000);
        assert_eq!(rec.samples().len(), 2000);
        assert_eq!(rec.sample_rate(), 1000);
        assert_eq!(rec.duration(), 2.0);
    }

    #[test]
    fn open_rejects_non_wav_path() {
        assert!(WavRecording::open("notes.txt").is_err());
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// NAUTA — Long-Term Spectral Average toolkit for passive acoustic monitoring.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute an LTSA from a wav recording and export it as a PNG.
    Ltsa(LtsaArgs),

    /// Prefix a device id to a .wav file, or to every .wav in a folder.
    AddId {
        /// A .wav file or a folder of .wav files.
        path: PathBuf,
        /// Device id to prefix (DEVICEID_ is prepended to each filename).
        device_id: String,
    },

    /// Strip the trailing three-character suffix (and its underscore) from
    /// .wav filenames, e.g. NAME_048.wav → NAME.wav.
    StripFs {
        /// A .wav file or a folder of .wav files.
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct LtsaArgs {
    /// Input recording (DEVICEID_YYYYMMDD_HHMMSS.wav).
    pub input: PathBuf,

    /// Output PNG path.
    #[arg(short, long, default_value = "ltsa.png")]
    pub output: PathBuf,

    /// Channel to analyze in a multi-channel file.
    #[arg(long, default_value_t = 0)]
    pub channel: usize,

    /// TOML file with parameter overrides (div_len, subdiv_len, nfft, noverlap).
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Samples per time-division (default: half a second).
    #[arg(long)]
    pub div_len: Option<usize>,

    /// Samples per spectral sub-window (default: power of two near fs/5).
    #[arg(long)]
    pub subdiv_len: Option<usize>,

    /// FFT length (default: subdiv_len).
    #[arg(long)]
    pub nfft: Option<usize>,

    /// Overlap between consecutive sub-windows in samples.
    #[arg(long)]
    pub noverlap: Option<usize>,

    /// Crop: lower time bound in seconds.
    #[arg(long)]
    pub tmin: Option<f64>,

    /// Crop: upper time bound in seconds.
    #[arg(long)]
    pub tmax: Option<f64>,

    /// Crop: lower frequency bound in Hz.
    #[arg(long)]
    pub fmin: Option<f64>,

    /// Crop: upper frequency bound in Hz.
    #[arg(long)]
    pub fmax: Option<f64>,

    /// Resample vertically to this many rows (nearest-row selection).
    #[arg(long)]
    pub rows: Option<usize>,

    /// Resize the output image to exactly WIDTHxHEIGHT (interpolated).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Propagate -inf for zero-energy sub-bands instead of flooring.
    #[arg(long, default_value_t = false)]
    pub propagate_silence: bool,
}

impl LtsaArgs {
    /// `true` if any crop bound was given on the command line.
    #[must_use]
    pub fn wants_crop(&self) -> bool {
        self.tmin.is_some() || self.tmax.is_some() || self.fmin.is_some() || self.fmax.is_some()
    }

    /// Parse `--size WIDTHxHEIGHT`.
    ///
    /// # Errors
    /// Returns an error on a malformed size string.
    pub fn parse_size(&self) -> anyhow::Result<Option<(u32, u32)>> {
        let Some(size) = self.size.as_deref() else {
            return Ok(None);
        };
        let (w, h) = size
            .split_once('x')
            .ok_or_else(|| anyhow::anyhow!("--size expects WIDTHxHEIGHT, got '{size}'"))?;
        Ok(Some((
            w.parse()
                .map_err(|_| anyhow::anyhow!("invalid width '{w}'"))?,
            h.parse()
                .map_err(|_| anyhow::anyhow!("invalid height '{h}'"))?,
        )))
    }
}

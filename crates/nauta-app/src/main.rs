use anyhow::{Context, Result, bail};
use clap::Parser;

use nauta_core::params::ParamOverrides;
use nauta_ltsa::engine::{CropRequest, Ltsa, SilencePolicy};
use nauta_render::ResizeSpec;
use nauta_source::recording::WavRecording;

pub mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    match cli.command {
        cli::Command::Ltsa(args) => run_ltsa(&args),
        cli::Command::AddId { path, device_id } => {
            let n = nauta_source::add_device_id(&path, &device_id)?;
            println!("Renamed {n} file(s)");
            Ok(())
        }
        cli::Command::StripFs { path } => {
            let n = nauta_source::remove_fs_suffix(&path)?;
            println!("Renamed {n} file(s)");
            Ok(())
        }
    }
}

fn run_ltsa(args: &cli::LtsaArgs) -> Result<()> {
    let recording = WavRecording::open_channel(&args.input, args.channel)?;
    println!(
        "{}: device {}, start {}, {:.1}s",
        recording.filename, recording.device_id, recording.start, recording.duration
    );

    let mut ltsa = Ltsa::new(&recording)?;
    if args.propagate_silence {
        ltsa.set_silence_policy(SilencePolicy::Propagate);
    }
    ltsa.set_params(&resolve_overrides(args)?)?;
    ltsa.compute()?;

    if args.wants_crop() {
        let viewport = ltsa.viewport();
        ltsa.crop(&CropRequest {
            tmin: args.tmin.unwrap_or(viewport.tmin),
            tmax: args.tmax,
            fmin: args.fmin.unwrap_or(viewport.fmin),
            fmax: args.fmax,
        })?;
    }

    ltsa.scale_to_u8()?;

    let resize = resolve_resize(args)?;
    let matrix = ltsa.matrix().context("no matrix after compute")?;
    nauta_render::render_png(matrix, resize, &args.output)?;

    let viewport = ltsa.viewport();
    println!(
        "Wrote {} ({:.1}-{:.1}s, {:.0}-{:.0}Hz)",
        args.output.display(),
        viewport.tmin,
        viewport.tmax,
        viewport.fmin,
        viewport.fmax
    );
    Ok(())
}

/// Merge the optional TOML override file with command-line flags; flags win.
fn resolve_overrides(args: &cli::LtsaArgs) -> Result<ParamOverrides> {
    let mut overrides = match &args.params {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {}", path.display()))?;
            ParamOverrides::from_toml_str(&text)?
        }
        None => ParamOverrides::default(),
    };
    overrides.div_len = args.div_len.or(overrides.div_len);
    overrides.subdiv_len = args.subdiv_len.or(overrides.subdiv_len);
    overrides.nfft = args.nfft.or(overrides.nfft);
    overrides.noverlap = args.noverlap.or(overrides.noverlap);
    Ok(overrides)
}

fn resolve_resize(args: &cli::LtsaArgs) -> Result<Option<ResizeSpec>> {
    let exact = args.parse_size()?;
    match (args.rows, exact) {
        (Some(_), Some(_)) => bail!("--rows and --size are mutually exclusive"),
        (Some(rows), None) => Ok(Some(ResizeSpec::Rows(rows))),
        (None, Some((width, height))) => Ok(Some(ResizeSpec::Exact { width, height })),
        (None, None) => Ok(None),
    }
}

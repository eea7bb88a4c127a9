use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{info, warn};

/// Prefix `deviceid_` to a `.wav` file, or to every `.wav` directly inside
/// a directory. Useful when a recorder does not write its own id into the
/// filename. Returns the number of files renamed.
///
/// # Errors
/// Returns an error if `target` is neither a directory nor a `.wav` file,
/// or if a rename fails.
pub fn add_device_id(target: &Path, device_id: &str) -> Result<usize> {
    apply_to_wavs(target, &|path| {
        let filename = file_name(path)?;
        let renamed = path.with_file_name(format!("{device_id}_{filename}"));
        fs::rename(path, &renamed)
            .with_context(|| format!("Cannot rename {}", path.display()))?;
        info!("Renamed: {filename} to {}", file_name(&renamed)?);
        Ok(1)
    })
}

/// Strip the trailing three characters of the stem, plus the underscore
/// before them if present (`NAME_048.wav` → `NAME.wav`). Stems too short to
/// lose three characters are skipped with a warning. Returns the number of
/// files renamed.
///
/// # Errors
/// Returns an error if `target` is neither a directory nor a `.wav` file,
/// or if a rename fails.
pub fn remove_fs_suffix(target: &Path) -> Result<usize> {
    apply_to_wavs(target, &|path| {
        let filename = file_name(path)?;
        let Some(stem) = filename.strip_suffix(".wav") else {
            return Ok(0);
        };
        if stem.chars().count() <= 3 {
            warn!("'{filename}' is too short to remove three characters, skipped");
            return Ok(0);
        }
        let mut chars = stem.chars();
        for _ in 0..3 {
            chars.next_back();
        }
        let shortened = chars.as_str();
        let shortened = shortened.strip_suffix('_').unwrap_or(shortened);
        let renamed = path.with_file_name(format!("{shortened}.wav"));
        fs::rename(path, &renamed)
            .with_context(|| format!("Cannot rename {}", path.display()))?;
        info!("Renamed: {filename} to {shortened}.wav");
        Ok(1)
    })
}

fn is_wav(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("wav")
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))
}

/// Run `op` on a single `.wav` file, or on every `.wav` directly inside a
/// directory (entries are collected first so renames don't disturb the
/// directory walk).
fn apply_to_wavs(target: &Path, op: &dyn Fn(&Path) -> Result<usize>) -> Result<usize> {
    if target.is_dir() {
        let wavs: Vec<PathBuf> = fs::read_dir(target)
            .with_context(|| format!("Cannot read directory {}", target.display()))?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && is_wav(p))
            .collect();
        let mut renamed = 0;
        for path in wavs {
            renamed += op(&path)?;
        }
        Ok(renamed)
    } else if target.is_file() && is_wav(target) {
        op(target)
    } else {
        bail!(
            "'{}' is neither a folder nor a .wav file",
            target.display()
        );
    }
}

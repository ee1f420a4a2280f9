//! Output path policies
//!
//! Scale outputs land in a `modified_files` directory next to the input and
//! overwrite deterministically per gain value. Flip outputs land in a fresh
//! `Swapped` (or `Swapped_N`) directory resolved once per batch.

use std::path::{Path, PathBuf};

/// Filename token for a gain value: shortest round-trip formatting of the
/// exact value, then `.` -> `p` and `-` -> `minus`.
///
/// Total over all finite inputs, and the same gain always yields the same
/// token, so re-running with one gain value maps to one output name.
pub fn gain_token(gain_db: f64) -> String {
    format!("{}", gain_db).replace('.', "p").replace('-', "minus")
}

/// Filename suffix for a scaled file, e.g. `_modified_minus0p2dB_loss`
pub fn scale_suffix(gain_db: f64) -> String {
    let kind = if gain_db >= 0.0 { "gain" } else { "loss" };
    format!("_modified_{}dB_{}", gain_token(gain_db), kind)
}

/// Output path for a scaled file: `<inputDir>/modified_files/<base><suffix>.<ext>`
///
/// Deterministic per (input, gain): re-running with the same gain overwrites
/// the prior output, which is the intended behavior.
pub fn scale_output_path(input: &Path, gain_db: f64) -> PathBuf {
    let dir = parent_or_cwd(input).join("modified_files");
    let base = stem_of(input);
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", base, scale_suffix(gain_db), ext),
        None => format!("{}{}", base, scale_suffix(gain_db)),
    };
    dir.join(name)
}

/// First unused of `<base_dir>/Swapped`, `<base_dir>/Swapped_1`, ...
///
/// Every batch run lands in a fresh directory; nothing existing is reused or
/// overwritten.
pub fn unique_swapped_dir(base_dir: &Path) -> PathBuf {
    let mut target = base_dir.join("Swapped");
    let mut counter = 0u32;
    while target.exists() {
        counter += 1;
        target = base_dir.join(format!("Swapped_{}", counter));
    }
    target
}

/// Output path for a flipped file inside the batch's swapped directory
pub fn flip_output_path(swapped_dir: &Path, input: &Path) -> PathBuf {
    let base = stem_of(input);
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_Swapped.{}", base, ext),
        None => format!("{}_Swapped", base),
    };
    swapped_dir.join(name)
}

/// Parent directory of a path, falling back to the current directory
pub fn parent_or_cwd(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use handheld_asteroids_core::Tuning;
use tracing::info;

/// Tuning file used when `--tuning` is not given.
pub const TUNING_ENV: &str = "HANDHELD_ASTEROIDS_TUNING";
/// Seed used when `--seed` is not given.
pub const SEED_ENV: &str = "HANDHELD_ASTEROIDS_SEED";

/// Load gameplay tuning from `path`, else from the file named by
/// [`TUNING_ENV`], else the shipped defaults. Missing fields keep their
/// defaults; out-of-range values are rejected.
pub fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let from_env = env::var_os(TUNING_ENV);
    let Some(path) = path.or(from_env.as_deref().map(Path::new)) else {
        return Ok(Tuning::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file: {}", path.display()))?;
    let tuning: Tuning = serde_json::from_str(&text)
        .with_context(|| format!("invalid tuning file: {}", path.display()))?;
    tuning
        .validate()
        .with_context(|| format!("invalid tuning file: {}", path.display()))?;
    if tuning != Tuning::default() {
        info!(path = %path.display(), ?tuning, "using custom tuning");
    }
    Ok(tuning)
}

/// Decimal or `0x`-prefixed hexadecimal.
pub fn parse_u32(value: &str) -> Result<u32, String> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    parsed.map_err(|err| format!("invalid number {value:?}: {err}"))
}

pub fn read_env_u32(name: &str) -> Result<Option<u32>> {
    match env::var(name) {
        Ok(value) => parse_u32(&value)
            .map(Some)
            .map_err(|err| anyhow::anyhow!("{name}: {err}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {name}")),
    }
}

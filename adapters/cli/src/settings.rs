//! Loading of run tuning from TOML files.

use std::path::Path;

use anyhow::{Context, Result};
use wave_survival_core::Tuning;

/// Reads and parses a tuning file. Tables and keys missing from the file keep
/// their default values.
pub(crate) fn load(path: &Path) -> Result<Tuning> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    parse(&content).with_context(|| format!("failed to parse tuning file {}", path.display()))
}

/// Parses tuning from TOML text and validates it.
pub(crate) fn parse(content: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(content)?;
    tuning.validate()?;
    Ok(tuning)
}

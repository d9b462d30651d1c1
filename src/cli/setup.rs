use anyhow::{Context, Result};
use std::path::Path;

const EXAMPLE_ENV_FILE: &str = include_str!("../../docs/example_env_file.csv");

/// Writes an example environment file at `path`. An existing file is only replaced with `force`.
pub fn setup_at_path<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
    let path = path.as_ref();

    if path.exists() && !force {
        anyhow::bail!(
            "Environment file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, EXAMPLE_ENV_FILE)
        .with_context(|| format!("Failed to write environment file to {}", path.display()))?;

    tracing::info!("Created example environment file at {}", path.display());
    Ok(())
}

use access_policy::PolicyConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a `.env` file from the current directory if one exists
pub fn load_dotenv() {
    if let Ok(dir) = env::current_dir() {
        let env_file = dir.join(".env");
        if env_file.exists() {
            dotenv::from_path(&env_file).ok();
        }
    }
}

/// Load the policy configuration, falling back to defaults when no file is given.
///
/// Returns the configuration together with the resolved file path, if any.
pub fn load(path: Option<&Path>) -> Result<(PolicyConfig, Option<PathBuf>)> {
    let Some(path) = path else {
        debug!("No policy configuration given, using defaults");
        return Ok((PolicyConfig::default(), None));
    };

    let base = env::current_dir().context("Failed to get current directory")?;
    let resolved = resolve_path(path, &base);
    debug!(path = %resolved.display(), "Resolved policy configuration path");

    let config = PolicyConfig::from_file(&resolved).with_context(|| {
        format!(
            "Failed to load policy configuration from {}",
            resolved.display()
        )
    })?;

    Ok((config, Some(resolved)))
}

/// Relative paths are taken relative to the base directory
fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}

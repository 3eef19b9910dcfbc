// ============================================================================
// src/util/paths.rs – locate the default .env relative to the running binary
// ============================================================================

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_FILE_NAME: &str = ".env";

/// `<dir of binary>/../.env`.
pub fn env_path_for_binary(binary: &Path) -> Result<PathBuf> {
    let bin_dir = binary
        .parent()
        .ok_or_else(|| anyhow!("binary path has no parent: {}", binary.display()))?;
    let root = bin_dir
        .parent()
        .ok_or_else(|| anyhow!("binary directory has no parent: {}", bin_dir.display()))?;
    Ok(root.join(ENV_FILE_NAME))
}

/// Resolve the default env file from the running executable, following
/// symlinks so an installed link still points at the real layout.
pub fn default_env_path() -> Result<PathBuf> {
    let current = std::env::current_exe().context("determine current executable path")?;
    let resolved = fs::canonicalize(&current).unwrap_or(current);
    env_path_for_binary(&resolved)
}

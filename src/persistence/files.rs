use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and in the home directory
pub const DATA_DIR_NAME: &str = ".studyplan";

/// Resolve the data directory.
///
/// An explicit override wins, then a local .studyplan found by walking up
/// from the current directory, then ~/.studyplan.
pub fn resolve_data_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find local .studyplan directory by walking up the directory tree
fn find_local_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Initialize a local .studyplan directory in the current directory
pub fn init_local_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let data_dir = current_dir.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(dir).context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("platform home directory is not set ({0})")]
    PlatformHomeMissing(&'static str),
    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

#[cfg(target_os = "windows")]
const PLATFORM_HOME_VAR: &str = "APPDATA";
#[cfg(not(target_os = "windows"))]
const PLATFORM_HOME_VAR: &str = "HOME";

fn platform_home() -> Result<PathBuf, HomeDirError> {
    std::env::var_os(PLATFORM_HOME_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or(HomeDirError::PlatformHomeMissing(PLATFORM_HOME_VAR))
}

/// Expand a leading `~` into the platform home directory.
fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: &Path) -> Result<PathBuf, HomeDirError> {
    if p.is_absolute() {
        return Ok(p.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(HomeDirError::CurrentDir)?;
    Ok(cwd.join(p))
}

/// Resolve the application home directory.
///
/// * `Some(path)` is tilde-expanded and made absolute against the current directory.
/// * `None` falls back to `<platform home>/<default_subdir>`
///   (`%APPDATA%` on Windows, `$HOME` elsewhere).
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let raw = match configured {
        Some(p) => expand_tilde(p.trim())?,
        None => platform_home()?.join(default_subdir),
    };
    let resolved = absolutize(&raw)?;

    if create {
        std::fs::create_dir_all(&resolved).map_err(|source| HomeDirError::Create {
            path: resolved.clone(),
            source,
        })?;
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/home");
        let out = resolve_home_dir(Some(target.to_string_lossy().to_string()), ".x", true).unwrap();
        assert_eq!(out, target);
        assert!(out.is_dir());
    }

    #[test]
    fn relative_path_is_absolutized_without_creating() {
        let out = resolve_home_dir(Some("some/relative/dir".into()), ".x", false).unwrap();
        assert!(out.is_absolute());
        assert!(out.ends_with("some/relative/dir"));
    }
}

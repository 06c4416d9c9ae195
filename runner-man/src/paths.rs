use std::path::PathBuf;

use crate::error::{InstallError, Result};

pub const HOME_PLACEHOLDER: &str = "$HOME";

/// Replaces `$HOME` anywhere in `path`, and a leading `~`, with `home`.
///
/// A path that needs a home directory fails when `home` is `None`, rather
/// than landing relative to the working directory.
pub fn expand_home(path: &str, home: Option<&str>) -> Result<PathBuf> {
    let needs_home = path.contains(HOME_PLACEHOLDER) || path == "~" || path.starts_with("~/");
    if !needs_home {
        return Ok(PathBuf::from(path));
    }
    let Some(home) = home else {
        return Err(InstallError::MissingHome(path.to_string()));
    };

    let path = path.replace(HOME_PLACEHOLDER, home);
    let path = if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{}", home.trim_end_matches('/'), rest)
    } else {
        path
    };

    Ok(PathBuf::from(path))
}

/// Reads `HOME` from the environment. Unset and empty are both `None`.
pub fn home_dir() -> Option<String> {
    std::env::var("HOME").ok().filter(|home| !home.is_empty())
}

//! Environment file loading and user config locations

use std::path::PathBuf;

/// `~/.config/parkway` (or the platform config dir), if resolvable
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("parkway"))
        .or_else(|| dirs::home_dir().map(|h| h.join(".config").join("parkway")))
}

/// Env files checked by [`load_env_file`]; the first one that exists is used
pub fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/usr/local/etc/parkway/parkway.env")];
    paths.extend(user_config_dir().map(|dir| dir.join("parkway.env")));
    paths
}

/// Apply the first Parkway env file found. Variables already present in the
/// process environment are left alone.
pub fn load_env_file() {
    let Some(path) = env_file_candidates().into_iter().find(|p| p.exists()) else {
        return;
    };
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let applied = apply_env_file(&contents);
            tracing::debug!("Applied {} variables from {}", applied, path.display());
        }
        Err(e) => tracing::warn!("Cannot read {}: {}", path.display(), e),
    }
}

/// Set each `KEY=value` from `contents` that is not already set; returns how
/// many were set
pub fn apply_env_file(contents: &str) -> usize {
    let mut applied = 0;
    for (key, value) in contents.lines().filter_map(parse_env_line) {
        if std::env::var_os(key).is_none() {
            std::env::set_var(key, value);
            applied += 1;
        }
    }
    applied
}

/// One env-file line as (key, value).
///
/// Blank lines and `#` comments yield `None`, as does a line without `=` or
/// with an empty key. An `export ` prefix and one layer of matching quotes
/// around the value are stripped.
pub fn parse_env_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = value.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| value.strip_prefix(*q).and_then(|v| v.strip_suffix(*q)))
        .unwrap_or(value);
    Some((key, unquoted))
}

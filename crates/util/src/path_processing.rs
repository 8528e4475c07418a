use std::{env, path::PathBuf};

use dirs_next::home_dir;

/// Expand a leading `~` (either separator style) to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// Read a path override from `variable`, ignoring unset or blank values.
pub fn path_from_env(variable: &str) -> Option<PathBuf> {
    let value = env::var(variable).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| expand_tilde(trimmed))
}

use std::path::{Path, PathBuf};

/// Resolve the bot's working directory.
///
/// Priority:
/// 1. `--root` flag / `VOUCH_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `config.json`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_config_dir(&cwd).unwrap_or(cwd)
}

fn find_config_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| vouch_core::paths::config_path(dir).is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        let subdir = dir.path().join("logs/old");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_config_dir(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn config_directory_is_not_a_match() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("config.json")).unwrap();
        assert_ne!(find_config_dir(dir.path()).as_deref(), Some(dir.path()));
    }
}

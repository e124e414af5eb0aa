use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "config.json";
pub const DATA_FILE: &str = "information.json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve the data file against `root`. Absolute paths are kept as given.
pub fn data_path(root: &Path, data_file: &Path) -> PathBuf {
    if data_file.is_absolute() {
        data_file.to_path_buf()
    } else {
        root.join(data_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_path_relative_joins_root() {
        let p = data_path(Path::new("/srv/bot"), Path::new(DATA_FILE));
        assert_eq!(p, PathBuf::from("/srv/bot/information.json"));
    }

    #[test]
    fn data_path_absolute_is_kept() {
        let p = data_path(Path::new("/srv/bot"), Path::new("/var/lib/vouches.json"));
        assert_eq!(p, PathBuf::from("/var/lib/vouches.json"));
    }

    #[test]
    fn config_path_under_root() {
        assert_eq!(
            config_path(Path::new("/srv/bot")),
            PathBuf::from("/srv/bot/config.json")
        );
    }
}

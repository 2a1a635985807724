use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const TELESALES_DIR: &str = ".telesales";
pub const CONFIG_FILE: &str = ".telesales/config.yaml";
pub const DATABASE_FILE: &str = ".telesales/telesales.db";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn telesales_dir(root: &Path) -> PathBuf {
    root.join(TELESALES_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Default database location when the config does not override it.
pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_live_under_telesales_dir() {
        let root = Path::new("/srv/crm");
        assert_eq!(config_path(root), PathBuf::from("/srv/crm/.telesales/config.yaml"));
        assert_eq!(
            database_path(root),
            PathBuf::from("/srv/crm/.telesales/telesales.db")
        );
        assert!(database_path(root).starts_with(telesales_dir(root)));
    }
}

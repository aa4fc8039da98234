use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::scan::{DEFAULT_COOLDOWN, DEFAULT_SESSION_PREFIX};
use crate::Result;

pub const DATABASE_NAME: &str = "qr_scanner.db";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct QrscanConfig {
    pub database: Option<String>,
    pub session_prefix: Option<String>,
    pub cooldown_ms: Option<u64>,
    pub atomic_saves: Option<bool>,
}

impl QrscanConfig {
    pub fn session_prefix(&self) -> &str {
        self.session_prefix.as_deref().unwrap_or(DEFAULT_SESSION_PREFIX)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown_ms.map(Duration::from_millis).unwrap_or(DEFAULT_COOLDOWN)
    }

    pub fn atomic_saves(&self) -> bool {
        self.atomic_saves.unwrap_or(false)
    }

    /// CLI flag first, then the config file, then `.qrscan/qr_scanner.db` under `base`
    pub fn resolve_database(&self, flag: Option<&Path>, base: &Path) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| default_database_path_in(base))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("qrscan.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".qrscan").join(DATABASE_NAME)
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<QrscanConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: QrscanConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &QrscanConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create the directory holding the database file if it is missing
pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QrscanConfig::default();
        assert_eq!(config.session_prefix(), "Escaneo");
        assert_eq!(config.cooldown(), Duration::from_millis(500));
        assert!(!config.atomic_saves());
        assert_eq!(
            config.resolve_database(None, Path::new("/tmp/app")),
            PathBuf::from("/tmp/app/.qrscan/qr_scanner.db")
        );
    }

    #[test]
    fn test_database_precedence() {
        let config = QrscanConfig {
            database: Some("from-config.db".into()),
            ..Default::default()
        };
        let base = Path::new(".");
        assert_eq!(config.resolve_database(None, base), PathBuf::from("from-config.db"));
        assert_eq!(
            config.resolve_database(Some(Path::new("flag.db")), base),
            PathBuf::from("flag.db")
        );
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrscan.toml");
        let config = QrscanConfig {
            database: Some("scans.db".into()),
            session_prefix: Some("Scan".into()),
            cooldown_ms: Some(250),
            atomic_saves: Some(true),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(path.as_path())).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.cooldown(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.toml").as_path())).unwrap().is_none());
    }

    #[test]
    fn test_ensure_db_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("deeper").join(DATABASE_NAME);
        ensure_db_dir(&db).unwrap();
        assert!(db.parent().unwrap().is_dir());
    }

    #[test]
    fn test_ensure_db_dir_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = ensure_db_dir(&blocker.join("sub").join(DATABASE_NAME)).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}

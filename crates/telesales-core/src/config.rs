use crate::error::{CrmError, Result};
use crate::paths;
use crate::schedule::MonthlySchedule;
use crate::types::TierThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScheduleConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_day_of_month")]
    pub day_of_month: u32,
    #[serde(default)]
    pub hour_utc: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_day_of_month() -> u32 {
    1
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            day_of_month: default_day_of_month(),
            hour_utc: 0,
        }
    }
}

impl ScheduleConfig {
    pub fn monthly(&self) -> MonthlySchedule {
        MonthlySchedule {
            day_of_month: self.day_of_month,
            hour_utc: self.hour_utc,
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer token required on admin routes. `None` leaves them open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

fn default_port() -> u16 {
    3141
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            admin_token: None,
        }
    }
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Relative paths resolve against the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub tiers: TierThresholds,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            tiers: TierThresholds::default(),
            schedule: ScheduleConfig::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(CrmError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write the default config unless one already exists. Returns true if written.
    pub fn write_default(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Config::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    pub fn database_path(&self, root: &Path) -> PathBuf {
        match &self.database.path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => paths::database_path(root),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let error = |message: String| ConfigWarning {
            level: WarnLevel::Error,
            message,
        };

        for (name, value) in [
            ("platinum", self.tiers.platinum),
            ("gold", self.tiers.gold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                warnings.push(error(format!(
                    "tiers.{name} = {value} is outside [0, 1]"
                )));
            }
        }

        if self.tiers.gold >= self.tiers.platinum {
            warnings.push(error(format!(
                "tiers.gold ({}) must be below tiers.platinum ({})",
                self.tiers.gold, self.tiers.platinum
            )));
        }

        if !(1..=28).contains(&self.schedule.day_of_month) {
            warnings.push(error(format!(
                "schedule.day_of_month = {} must be between 1 and 28",
                self.schedule.day_of_month
            )));
        }

        if self.schedule.hour_utc > 23 {
            warnings.push(error(format!(
                "schedule.hour_utc = {} must be between 0 and 23",
                self.schedule.hour_utc
            )));
        }

        if self.server.admin_token.is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "server.admin_token is not set: admin routes accept any caller"
                    .to_string(),
            });
        }

        warnings
    }

    /// Fail on the first error-level warning.
    pub fn ensure_valid(&self) -> Result<()> {
        match self
            .validate()
            .into_iter()
            .find(|w| w.level == WarnLevel::Error)
        {
            Some(w) => Err(CrmError::InvalidConfig(w.message)),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.tiers.platinum, 0.8);
        assert_eq!(parsed.tiers.gold, 0.5);
        assert_eq!(parsed.server.port, 3141);
    }

    #[test]
    fn sparse_yaml_fills_defaults() {
        let parsed: Config = serde_yaml::from_str("server:\n  admin_token: s3cret\n").unwrap();
        assert_eq!(parsed.server.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(parsed.server.port, 3141);
        assert!(parsed.schedule.enabled);
        assert_eq!(parsed.schedule.day_of_month, 1);
    }

    #[test]
    fn load_missing_config_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(matches!(err, CrmError::NotInitialized));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.schedule.day_of_month = 15;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.schedule.day_of_month, 15);
    }

    #[test]
    fn write_default_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        assert!(Config::write_default(dir.path()).unwrap());

        let mut cfg = Config::load(dir.path()).unwrap();
        cfg.server.port = 8080;
        cfg.save(dir.path()).unwrap();

        assert!(!Config::write_default(dir.path()).unwrap());
        assert_eq!(Config::load(dir.path()).unwrap().server.port, 8080);
    }

    #[test]
    fn database_path_resolution() {
        let root = Path::new("/srv/crm");
        let mut cfg = Config::default();
        assert_eq!(
            cfg.database_path(root),
            PathBuf::from("/srv/crm/.telesales/telesales.db")
        );
        cfg.database.path = Some(PathBuf::from("data/crm.db"));
        assert_eq!(cfg.database_path(root), PathBuf::from("/srv/crm/data/crm.db"));
        cfg.database.path = Some(PathBuf::from("/var/lib/crm.db"));
        assert_eq!(cfg.database_path(root), PathBuf::from("/var/lib/crm.db"));
    }

    #[test]
    fn validate_flags_inverted_thresholds() {
        let mut cfg = Config::default();
        cfg.tiers.gold = 0.9;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("tiers.gold")));
        assert!(matches!(cfg.ensure_valid(), Err(CrmError::InvalidConfig(_))));
    }

    #[test]
    fn validate_flags_bad_schedule() {
        let mut cfg = Config::default();
        cfg.schedule.day_of_month = 31;
        cfg.schedule.hour_utc = 24;
        let errors: Vec<_> = cfg
            .validate()
            .into_iter()
            .filter(|w| w.level == WarnLevel::Error)
            .collect();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn default_config_only_warns_about_token() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
        assert!(cfg.ensure_valid().is_ok());
    }
}

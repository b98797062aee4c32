//! Layered configuration for the `honeydo` CLI.
//!
//! Priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env`)
//! 3. TOML config file (`<config_dir>/honeydo/config.toml`)
//! 4. Compiled defaults

use honeydo_core::{default_log_level, AuthUser};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "honeydo";
const DB_FILE_NAME: &str = "honeydo.sqlite3";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A session needs both an id and an email.
    #[error("session is incomplete: `{missing}` is not set")]
    IncompleteSession { missing: &'static str },
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    logging: LoggingFileConfig,
    session: SessionFileConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    db_path: Option<PathBuf>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LoggingFileConfig {
    level: Option<String>,
    dir: Option<PathBuf>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    user_id: Option<String>,
    email: Option<String>,
}

/// Global options shared by every subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to config file (default: `<config_dir>/honeydo/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long, env = "HONEYDO_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "HONEYDO_LOG", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "HONEYDO_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Acting user id.
    #[arg(long, env = "HONEYDO_USER_ID", global = true)]
    pub user_id: Option<String>,

    /// Acting user email.
    #[arg(long, env = "HONEYDO_USER_EMAIL", global = true)]
    pub user_email: Option<String>,
}

/// Fully resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoneydoConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// `None` when no data directory could be determined.
    pub log_dir: Option<PathBuf>,
    /// `None` means every command runs without a session.
    pub session: Option<AuthUser>,
}

impl HoneydoConfig {
    /// Loads configuration by merging CLI args, env vars and a TOML file.
    ///
    /// An explicit `--config` path that cannot be read is an error; a
    /// missing default file is treated as empty.
    pub fn load(args: &GlobalArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(args.config.as_deref())?;
        Self::resolve(args, &file, dirs::data_local_dir().as_deref())
    }

    fn resolve(
        args: &GlobalArgs,
        file: &ConfigFile,
        data_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let app_dir = data_dir.map(|dir| dir.join(APP_DIR));

        let db_path = args
            .db
            .clone()
            .or_else(|| file.storage.db_path.clone())
            .or_else(|| app_dir.as_ref().map(|dir| dir.join(DB_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME));

        let log_level = args
            .log_level
            .clone()
            .or_else(|| file.logging.level.clone())
            .unwrap_or_else(|| default_log_level().to_string());

        let log_dir = args
            .log_dir
            .clone()
            .or_else(|| file.logging.dir.clone())
            .or_else(|| app_dir.as_ref().map(|dir| dir.join("logs")));

        let user_id = args
            .user_id
            .clone()
            .or_else(|| file.session.user_id.clone());
        let email = args
            .user_email
            .clone()
            .or_else(|| file.session.email.clone());
        let session = match (user_id, email) {
            (Some(id), Some(email)) => Some(AuthUser::new(id, email)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteSession {
                    missing: "user_email",
                })
            }
            (None, Some(_)) => return Err(ConfigError::IncompleteSession { missing: "user_id" }),
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            session,
        })
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join(APP_DIR).join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir() -> &'static Path {
        Path::new("/data")
    }

    #[test]
    fn defaults_live_under_data_dir() {
        let file = ConfigFile::default();
        let config =
            HoneydoConfig::resolve(&GlobalArgs::default(), &file, Some(data_dir())).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/honeydo/honeydo.sqlite3"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/data/honeydo/logs")));
        assert_eq!(config.log_level, default_log_level().to_string());
        assert_eq!(config.session, None);
    }

    #[test]
    fn without_data_dir_db_falls_back_to_cwd() {
        let config =
            HoneydoConfig::resolve(&GlobalArgs::default(), &ConfigFile::default(), None).unwrap();
        assert_eq!(config.db_path, PathBuf::from("honeydo.sqlite3"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn toml_parsing_full() {
        let toml_str = r#"
[storage]
db_path = "/tmp/tasks.db"

[logging]
level = "warn"
dir = "/var/log/honeydo"

[session]
user_id = "user-a"
email = "a@example.com"
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let config =
            HoneydoConfig::resolve(&GlobalArgs::default(), &file, Some(data_dir())).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/tasks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/honeydo")));
        assert_eq!(
            config.session,
            Some(AuthUser::new("user-a", "a@example.com"))
        );
    }

    #[test]
    fn cli_overrides_file() {
        let toml_str = r#"
[storage]
db_path = "/tmp/tasks.db"

[session]
user_id = "user-a"
email = "a@example.com"
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let args = GlobalArgs {
            db: Some(PathBuf::from("/srv/other.db")),
            user_id: Some("user-b".to_string()),
            ..Default::default()
        };
        let config = HoneydoConfig::resolve(&args, &file, Some(data_dir())).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/srv/other.db"));
        assert_eq!(
            config.session,
            Some(AuthUser::new("user-b", "a@example.com"))
        );
    }

    #[test]
    fn half_configured_session_is_rejected() {
        let args = GlobalArgs {
            user_id: Some("user-a".to_string()),
            ..Default::default()
        };
        let err = HoneydoConfig::resolve(&args, &ConfigFile::default(), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IncompleteSession {
                missing: "user_email"
            }
        ));
    }

    #[test]
    fn explicit_missing_config_file_returns_error() {
        let result = load_config_file(Some(Path::new("/nonexistent/honeydo.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn explicit_config_file_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"error\"\n").unwrap();

        let file = load_config_file(Some(&path)).unwrap();
        assert_eq!(file.logging.level.as_deref(), Some("error"));
    }
}

// ⚙️ Configuration - defaults, optional TOML file, AQUA__* environment

use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub database_path: PathBuf,
    /// Log file used while the terminal UI owns the screen
    pub log_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

/// Default administrator, provisioned when no admin account exists.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Defaults, then `aqua-registration.toml` (or `file` when given), then
    /// `AQUA__SECTION__KEY` environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("aqua-registration").required(false),
        };

        Self::from_sources(source, Environment::with_prefix("AQUA").separator("__"))
    }

    fn from_sources(
        source: File<FileSourceFile, FileFormat>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("storage.database_path", "aqua-registration.db")?
            .set_default("storage.log_path", "aqua-registration.log")?
            .set_default("export.output_dir", ".")?
            .set_default("admin.email", "admin@aqua-registration.local")?
            .set_default("admin.name", "Administrator")?
            .set_default("admin.password", "change-me-now")?
            .add_source(source)
            .add_source(env)
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        // Missing file and an unused env prefix, so nothing from the
        // working directory or the shell leaks in
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("aqua-registration");
        let source = File::with_name(absent.to_str().unwrap()).required(false);
        let env = Environment::with_prefix("AQUA_DEFAULTS_TEST").separator("__");

        let config = AppConfig::from_sources(source, env).unwrap();
        assert_eq!(config.storage.database_path, PathBuf::from("aqua-registration.db"));
        assert_eq!(config.storage.log_path, PathBuf::from("aqua-registration.log"));
        assert_eq!(config.export.output_dir, PathBuf::from("."));
        assert_eq!(config.admin.email, "admin@aqua-registration.local");
        assert_eq!(config.admin.name, "Administrator");
        assert_eq!(config.admin.password, "change-me-now");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[storage]\ndatabase_path = \"/tmp/club.db\"\n\n[admin]\nemail = \"club@example.org\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.storage.database_path, PathBuf::from("/tmp/club.db"));
        assert_eq!(config.admin.email, "club@example.org");
        // Untouched keys keep their defaults
        assert_eq!(config.admin.name, "Administrator");
        assert_eq!(config.export.output_dir, PathBuf::from("."));
    }
}

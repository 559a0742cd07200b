use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ReportFormat;

/// Project defaults, shipped inside the binary.
const BLUEPRINT: &str = include_str!("../cmon.toml");

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub base_url: String,
    pub download_dir: String,
    pub report_format: String,
    pub log_level: String,
}

impl Settings {
    /// Reads settings without logging; call before `logging::init`.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(get_user_config_path().as_deref(), Path::new("cmon.toml"))
    }

    /// Blueprint, then the user file, then a local override, then `CMON_*`
    /// environment variables.
    pub fn load(user_config: Option<&Path>, local_config: &Path) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(BLUEPRINT, FileFormat::Toml));
        if let Some(path) = user_config {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        let s = builder
            .add_source(File::from(local_config.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CMON"))
            .build()?;

        s.try_deserialize()
    }

    /// Falls back to HTML when the configured value is unknown.
    pub fn report_format(&self) -> ReportFormat {
        ReportFormat::parse(&self.report_format).unwrap_or_else(|| {
            tracing::warn!("Unknown report format {:?}, using html", self.report_format);
            ReportFormat::Html
        })
    }

    pub fn download_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.download_dir).to_string())
    }
}

/// Creates the user config from the blueprint on first run. Logs, so call
/// it once logging is up.
pub fn ensure_user_config() {
    let Some(path) = get_user_config_path() else {
        tracing::warn!("No home directory, user config not created");
        return;
    };
    match ensure_user_config_at(&path) {
        Ok(true) => tracing::info!("Created {}", path.display()),
        Ok(false) => {}
        Err(e) => tracing::warn!("Could not create {}: {}", path.display(), e),
    }
}

/// Returns whether the file had to be written.
pub fn ensure_user_config_at(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write_blueprint(path)?;
    Ok(true)
}

fn write_blueprint(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, BLUEPRINT)
}

pub fn get_user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("cmon");
    path.push("cmon.toml");
    Some(path)
}

pub fn save_report_format(format: ReportFormat) -> Result<(), anyhow::Error> {
    let path = get_user_config_path()
        .ok_or_else(|| anyhow::anyhow!("Failed to get home directory"))?;
    save_report_format_to(&path, format)
}

/// Rewrites one key of a TOML file, keeping every other key as it was.
pub fn save_report_format_to(path: &Path, format: ReportFormat) -> Result<(), anyhow::Error> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let mut doc = config_str.parse::<toml::Table>()?;

    doc.insert(
        "report_format".to_string(),
        toml::Value::String(format.as_str().to_string()),
    );

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_string())?;

    Ok(())
}

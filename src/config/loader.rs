//! Configuration loading and discovery for `img2gd.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::Img2gdConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "img2gd.toml";

/// Environment variable overriding the save directory.
pub const SAVE_DIR_ENV: &str = "IMG2GD_SAVE_DIR";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse img2gd.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", bullet_list(.0))]
    Validation(Vec<String>),
    /// No save directory configured and no platform default available
    #[error("No save directory configured; set storage.save_dir, IMG2GD_SAVE_DIR or --save-dir")]
    NoSaveDir,
}

fn bullet_list(errors: &[String]) -> String {
    errors.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n")
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub editor_layer: Option<u16>,
    pub alpha_threshold: Option<u8>,
    pub origin: Option<[i32; 2]>,
    pub revision: Option<u32>,
    pub save_dir: Option<PathBuf>,
    pub backup: Option<bool>,
    pub verbose: Option<bool>,
}

/// Find img2gd.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for img2gd.toml
/// 2. Check XDG_CONFIG_HOME/img2gd/img2gd.toml (or ~/.config/img2gd/img2gd.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find img2gd.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("img2gd").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find img2gd.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an img2gd.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration.
pub fn load_config(path: Option<&Path>) -> Result<Img2gdConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(Img2gdConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<Img2gdConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: Img2gdConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut Img2gdConfig, overrides: &CliOverrides) {
    if let Some(layer) = overrides.editor_layer {
        config.convert.editor_layer = layer;
    }
    if let Some(threshold) = overrides.alpha_threshold {
        config.convert.alpha_threshold = threshold;
    }
    if let Some(origin) = overrides.origin {
        config.convert.origin = origin;
    }
    if let Some(revision) = overrides.revision {
        config.convert.revision = revision;
    }
    if let Some(ref save_dir) = overrides.save_dir {
        config.storage.save_dir = Some(save_dir.clone());
    }
    if let Some(backup) = overrides.backup {
        config.storage.backup = backup;
    }
    if let Some(verbose) = overrides.verbose {
        config.log.verbose = verbose;
    }
}

/// Resolve the save directory.
///
/// Precedence: `storage.save_dir` (config or CLI), then `IMG2GD_SAVE_DIR`,
/// then the platform's Geometry Dash data directory.
pub fn resolve_save_dir(config: &Img2gdConfig) -> Result<PathBuf, ConfigError> {
    if let Some(ref dir) = config.storage.save_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = env::var_os(SAVE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    default_save_dir().ok_or(ConfigError::NoSaveDir)
}

/// Platform default save directory.
fn default_save_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        env::var_os("LOCALAPPDATA").map(|d| PathBuf::from(d).join("GeometryDash"))
    } else {
        env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
            .ok()
            .map(|d| d.join("GeometryDash"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(b"[convert]\neditor_layer = 1")
            .expect("should write config content");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        File::create(&config_path).expect("should create config file");

        let subdir = temp.path().join("art").join("sprites");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[convert]\nalpha_threshold = 10\norigin = [5, 6]\n")
            .expect("should write config content");

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert_eq!(config.convert.alpha_threshold, 10);
        assert_eq!(config.convert.origin, [5, 6]);
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[convert\n").expect("should write config content");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = temp.path().join(CONFIG_FILE);
        fs::write(&config_path, "[log]\ndir = \"\"\n").expect("should write config content");

        match load_config(Some(&config_path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("log.dir"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = Img2gdConfig::default();
        let overrides = CliOverrides {
            editor_layer: Some(4),
            origin: Some([1, 2]),
            backup: Some(false),
            verbose: Some(true),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.convert.editor_layer, 4);
        assert_eq!(config.convert.origin, [1, 2]);
        assert_eq!(config.convert.alpha_threshold, Img2gdConfig::default().convert.alpha_threshold);
        assert!(!config.storage.backup);
        assert!(config.log.verbose);
    }

    #[test]
    #[serial]
    fn test_resolve_save_dir_precedence() {
        let mut config = Img2gdConfig::default();

        env::set_var(SAVE_DIR_ENV, "/from/env");
        assert_eq!(resolve_save_dir(&config).unwrap(), PathBuf::from("/from/env"));

        config.storage.save_dir = Some(PathBuf::from("/from/config"));
        assert_eq!(resolve_save_dir(&config).unwrap(), PathBuf::from("/from/config"));

        env::remove_var(SAVE_DIR_ENV);
    }

    #[test]
    #[serial]
    fn test_resolve_save_dir_platform_default() {
        env::remove_var(SAVE_DIR_ENV);
        let config = Img2gdConfig::default();
        if let Ok(dir) = resolve_save_dir(&config) {
            assert!(dir.ends_with("GeometryDash"));
        }
    }
}

use crate::domain::SemanticVersion;
use crate::error::{Result, TagtasticError};
use crate::themes::DEFAULT_THEME;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Repo-local config file name, used when neither `--config-path` nor
/// `TAGTASTIC_CONFIG` is given
pub const REPO_CONFIG_FILE: &str = ".tagtastic.toml";

/// Key under which `generate --record` stores a codename that has no
/// version yet
pub const UNRELEASED_KEY: &str = "unreleased";

const DEFAULT_FORMAT: &str = "text";

/// Represents the tagtastic configuration record.
///
/// Holds the preferred theme and output format plus the history of
/// codenames already assigned to versions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub default_theme: String,

    #[serde(default)]
    pub default_format: String,

    #[serde(default)]
    pub used_codenames: BTreeMap<String, String>,

    #[serde(default)]
    pub api: ApiConfig,
}

/// Settings for a remote codename service.
///
/// Stored and round-tripped only; nothing in tagtastic talks to the network.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub cache_dir: String,

    #[serde(default)]
    pub cache_ttl: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_theme: DEFAULT_THEME.to_string(),
            default_format: DEFAULT_FORMAT.to_string(),
            used_codenames: BTreeMap::new(),
            api: ApiConfig::default(),
        }
    }
}

impl Config {
    /// A config with every field empty, as read from a missing file
    pub fn empty() -> Self {
        Config {
            default_theme: String::new(),
            default_format: String::new(),
            used_codenames: BTreeMap::new(),
            api: ApiConfig::default(),
        }
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file is not an error and yields [`Config::empty`], so
    /// callers can tell "never written" apart from "written with defaults".
    ///
    /// # Arguments
    /// * `path` - Already resolved path of the config file
    ///
    /// # Returns
    /// * `Ok(Config)` - Parsed or empty configuration
    /// * `Err` - If the file exists but cannot be read or parsed
    pub fn load(path: &Path) -> Result<Config> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::empty()),
            Err(e) => {
                return Err(TagtasticError::config(format!(
                    "read config {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        toml::from_str(&content).map_err(|e| {
            TagtasticError::config(format!("parse config {}: {}", path.display(), e))
        })
    }

    /// Serialized TOML form of this config
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| TagtasticError::config(format!("serialize config: {}", e)))
    }

    /// Writes the whole config to `path`, creating parent directories.
    /// The file is private to the user on unix.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        write_private(path, content.as_bytes())
    }

    /// Fill in theme and format when either is empty
    pub fn apply_defaults(&mut self) {
        if self.default_theme.trim().is_empty() {
            self.default_theme = DEFAULT_THEME.to_string();
        }
        if self.default_format.trim().is_empty() {
            self.default_format = DEFAULT_FORMAT.to_string();
        }
    }

    /// Newest recorded version by release precedence, skipping keys that
    /// are not versions (such as `unreleased`)
    pub fn latest_recorded(&self) -> Option<(&str, &str)> {
        self.used_codenames
            .iter()
            .filter_map(|(version, codename)| {
                SemanticVersion::parse(version)
                    .ok()
                    .map(|parsed| (parsed, version.as_str(), codename.as_str()))
            })
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, version, codename)| (version, codename))
    }
}

/// Records `codename` as used by `version` in the config at `path`.
///
/// Loads the existing file (or starts empty), fills in default theme and
/// format, then saves.
pub fn record_release(path: &Path, version: &str, codename: &str) -> Result<Config> {
    let mut config = Config::load(path)?;
    config.apply_defaults();
    config
        .used_codenames
        .insert(version.to_string(), codename.to_string());
    config.save(path)?;
    Ok(config)
}

/// Records a codename picked by `generate --record` under the
/// `unreleased` key, remembering the theme and format it was picked with.
pub fn record_unreleased(path: &Path, codename: &str, theme: &str, format: &str) -> Result<Config> {
    let mut config = Config::load(path)?;
    config.default_theme = theme.to_string();
    config.default_format = format.to_string();
    config
        .used_codenames
        .insert(UNRELEASED_KEY.to_string(), codename.to_string());
    config.save(path)?;
    Ok(config)
}

/// `~/.tagtastic/config.toml`
pub fn default_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".tagtastic").join("config.toml"))
        .ok_or_else(|| TagtasticError::config("resolve home directory"))
}

/// Resolves a user-supplied config path.
///
/// An empty path means [`default_path`]; a leading `~` is expanded to the
/// home directory.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return default_path();
    }
    expand_home(path)
}

/// Config path used by commands: the explicit override (flag or
/// `TAGTASTIC_CONFIG`, merged by the CLI parser) or `.tagtastic.toml`
/// under `root`.
pub fn config_path_for(override_path: Option<&str>, root: &Path) -> Result<PathBuf> {
    match override_path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(path) => resolve_path(path),
        None => Ok(root.join(REPO_CONFIG_FILE)),
    }
}

fn expand_home(path: &str) -> Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    let home =
        dirs::home_dir().ok_or_else(|| TagtasticError::config("resolve home directory"))?;
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

pub(crate) fn write_private(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

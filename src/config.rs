use crate::error::{CrmError, CrmResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.apper.io";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILE_NAME: &str = "crm-dashboard.toml";

const ENV_PROJECT_ID: &str = "APPER_PROJECT_ID";
const ENV_PUBLIC_KEY: &str = "APPER_PUBLIC_KEY";
const ENV_BASE_URL: &str = "APPER_BASE_URL";
const ENV_FALLBACK_PREFIX: &str = "VITE_";

/// Settings persisted in `crm-dashboard.toml`.
///
/// Every key is optional on disk; empty strings mean "not configured".
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub project_id: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("com", "example", "CrmDashboard")?;
        Some(proj.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads the config file from the platform config dir.
    ///
    /// A missing or unreadable file yields defaults; the failure is logged.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::new();
        };
        if !path.exists() {
            return Self::new();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring config at {}: {err}", path.display());
                Self::new()
            }
        }
    }

    pub fn load_from(path: &Path) -> CrmResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CrmError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str::<AppConfig>(&text)
            .map_err(|e| CrmError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    pub fn save(&self) -> std::io::Result<()> {
        match Self::default_path() {
            Some(path) => self.save_to(&path),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config dir",
            )),
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        fs::write(path, toml)
    }

    /// Applies `APPER_BASE_URL` on top of the file value.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env_value(&lookup, ENV_BASE_URL) {
            self.base_url = url;
        }
        self
    }

    pub fn base_url(&self) -> String {
        let normalized = crate::utils::normalize_url(&self.base_url);
        if normalized.is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            normalized
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// True when the file alone is enough to talk to the backend.
    pub fn has_credentials(&self) -> bool {
        !self.project_id.trim().is_empty() && !self.public_key.trim().is_empty()
    }

    /// Resolves credentials, preferring the environment over file values.
    pub fn resolve_credentials<F>(&self, lookup: F) -> CrmResult<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = env_value(&lookup, ENV_PROJECT_ID)
            .or_else(|| non_empty(&self.project_id))
            .ok_or_else(|| CrmError::Config(format!("{ENV_PROJECT_ID} is not set")))?;
        let public_key = env_value(&lookup, ENV_PUBLIC_KEY)
            .or_else(|| non_empty(&self.public_key))
            .ok_or_else(|| CrmError::Config(format!("{ENV_PUBLIC_KEY} is not set")))?;
        Ok(Credentials {
            project_id,
            public_key,
        })
    }
}

/// Project id and public key sent with every backend call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub project_id: String,
    pub public_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("project_id", &self.project_id)
            .field("public_key", &"<redacted>")
            .finish()
    }
}

/// Where credentials come from when a call is made.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Process environment first, then the given file settings.
    Environment(AppConfig),
    Fixed(Credentials),
}

impl CredentialSource {
    pub fn resolve(&self) -> CrmResult<Credentials> {
        match self {
            Self::Environment(config) => {
                config.resolve_credentials(|name| std::env::var(name).ok())
            }
            Self::Fixed(credentials) => Ok(credentials.clone()),
        }
    }
}

fn env_value<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| non_empty(&v))
        .or_else(|| lookup(&format!("{ENV_FALLBACK_PREFIX}{name}")).and_then(|v| non_empty(&v)))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

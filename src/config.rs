//! Configuration handling for the form workflow

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV_VAR: &str = "ACCESS_FLOW_CONFIG";

const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_MIN_IDENTIFIER_LEN: usize = 3;
const DEFAULT_PROBE_LATENCY_MS: u64 = 500;
const DEFAULT_REMOTE_LATENCY_MS: u64 = 2000;
const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_REMOTE_RETRIES: u32 = 0;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;
const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;
const DEFAULT_STRENGTH_MIN_LENGTH: usize = 12;
const DEFAULT_STORAGE_KEY: &str = "quantum_user";
const DEFAULT_SIGNUP_REDIRECT: &str = "index.html";
const DEFAULT_LOGIN_REDIRECT: &str = "dashboard.html";
const DEFAULT_RESERVED_USERNAMES: [&str; 4] = ["admin", "root", "neo", "operator"];

/// A credential pair the simulated authority accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoAccount {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

impl DemoAccount {
    fn builtin() -> Self {
        Self {
            email: "operator@nexus.io".to_string(),
            password: "Quantum#Access2077".to_string(),
            display_name: "Operator".to_string(),
        }
    }
}

/// User configuration for the workflow
///
/// Every field is optional; accessors fall back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FlowConfig {
    /// Quiet period before an availability probe fires
    pub debounce_ms: Option<u64>,
    /// Identifiers shorter than this are never probed
    pub min_identifier_len: Option<usize>,
    /// Simulated latency of an availability lookup
    pub probe_latency_ms: Option<u64>,
    /// Simulated latency of the remote submit call
    pub remote_latency_ms: Option<u64>,
    /// Upper bound on a single remote attempt
    pub remote_timeout_ms: Option<u64>,
    /// Extra attempts after a transient remote failure
    pub remote_retries: Option<u32>,
    /// Pause between a successful submit and the redirect
    pub redirect_delay_ms: Option<u64>,
    /// Minimum password length accepted on submit
    pub password_min_length: Option<usize>,
    /// Length requirement of the strength meter
    pub strength_min_length: Option<usize>,
    /// Key the signup record is stored under
    pub storage_key: Option<String>,
    /// File backing the key-value store
    pub storage_path: Option<PathBuf>,
    /// Usernames the simulated directory reports as taken
    pub reserved_usernames: Option<Vec<String>>,
    /// Accounts the simulated authority accepts on login
    pub demo_accounts: Option<Vec<DemoAccount>>,
    /// Redirect target after signup
    pub signup_redirect: Option<String>,
    /// Redirect target after login
    pub login_redirect: Option<String>,
}

impl FlowConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        ProjectDirs::from("io", "access-flow", "access-flow")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Default location of the key-value store file
    fn default_storage_path() -> PathBuf {
        ProjectDirs::from("io", "access-flow", "access-flow")
            .map(|dirs| dirs.data_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("access-flow-store.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: FlowConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn min_identifier_len(&self) -> usize {
        self.min_identifier_len.unwrap_or(DEFAULT_MIN_IDENTIFIER_LEN)
    }

    pub fn probe_latency(&self) -> Duration {
        Duration::from_millis(self.probe_latency_ms.unwrap_or(DEFAULT_PROBE_LATENCY_MS))
    }

    pub fn remote_latency(&self) -> Duration {
        Duration::from_millis(self.remote_latency_ms.unwrap_or(DEFAULT_REMOTE_LATENCY_MS))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms.unwrap_or(DEFAULT_REMOTE_TIMEOUT_MS))
    }

    pub fn remote_retries(&self) -> u32 {
        self.remote_retries.unwrap_or(DEFAULT_REMOTE_RETRIES)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms.unwrap_or(DEFAULT_REDIRECT_DELAY_MS))
    }

    pub fn password_min_length(&self) -> usize {
        self.password_min_length.unwrap_or(DEFAULT_PASSWORD_MIN_LENGTH)
    }

    pub fn strength_min_length(&self) -> usize {
        self.strength_min_length.unwrap_or(DEFAULT_STRENGTH_MIN_LENGTH)
    }

    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(Self::default_storage_path)
    }

    pub fn reserved_usernames(&self) -> Vec<String> {
        self.reserved_usernames.clone().unwrap_or_else(|| {
            DEFAULT_RESERVED_USERNAMES
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
    }

    pub fn demo_accounts(&self) -> Vec<DemoAccount> {
        self.demo_accounts
            .clone()
            .unwrap_or_else(|| vec![DemoAccount::builtin()])
    }

    pub fn signup_redirect(&self) -> &str {
        self.signup_redirect
            .as_deref()
            .unwrap_or(DEFAULT_SIGNUP_REDIRECT)
    }

    pub fn login_redirect(&self) -> &str {
        self.login_redirect
            .as_deref()
            .unwrap_or(DEFAULT_LOGIN_REDIRECT)
    }
}

//! CLI settings: config file, environment and command-line overrides
//!
//! Precedence, lowest first: `~/.config/legistar/config.toml`, environment
//! variables (a `.env` file in the working directory is loaded first),
//! command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use legistar::TransportConfig;

pub const ENV_API_KEY: &str = "LEGISTAR_API_KEY";
pub const ENV_GOVERNMENT: &str = "LEGISTAR_GOVERNMENT";
pub const ENV_ENDPOINT: &str = "LEGISTAR_ENDPOINT";
pub const ENV_WSDL: &str = "LEGISTAR_WSDL";
pub const ENV_TIMEOUT: &str = "LEGISTAR_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Partner credential (PartnerGUID)
    pub api_key: Option<String>,
    /// Default government GUID
    pub government: Option<String>,
    pub endpoint: Option<String>,
    /// WSDL URL or file path
    pub wsdl: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("legistar").join("config.toml"))
    }

    /// Read settings from a TOML file; a missing file yields defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment overrides read through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(government) = lookup(ENV_GOVERNMENT) {
            self.government = Some(government);
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
        if let Some(wsdl) = lookup(ENV_WSDL) {
            self.wsdl = Some(wsdl);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            let secs = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of seconds", ENV_TIMEOUT))?;
            self.timeout_secs = Some(secs);
        }
        Ok(self)
    }

    /// Load from the default config file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            log::trace!("No .env file loaded: {}", e);
        }

        let settings = match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.with_env(|key| std::env::var(key).ok())
    }

    /// Credential, or an error explaining where to set it
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "No API key configured. Set {} or add api_key to the config file.",
                ENV_API_KEY
            )
        })
    }

    pub fn transport_config(&self) -> TransportConfig {
        let mut builder = TransportConfig::builder();
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        if let Some(wsdl) = &self.wsdl {
            builder = if wsdl.eq_ignore_ascii_case("none") {
                builder.without_wsdl()
            } else {
                builder.wsdl(wsdl)
            };
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Settings as TOML with the credential masked
    pub fn to_masked_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.api_key.is_some() {
            shown.api_key = Some("***".to_string());
        }
        toml::to_string_pretty(&shown).context("Failed to format settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legistar::transport::WsdlSource;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_key = \"file-key\"\ngovernment = \"G-1\"\ntimeout_secs = 10\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path)
            .unwrap()
            .with_env(env(&[(ENV_GOVERNMENT, "G-2"), (ENV_API_KEY, "  ")]))
            .unwrap();

        assert_eq!(settings.api_key.as_deref(), Some("file-key"));
        assert_eq!(settings.government.as_deref(), Some("G-2"));
        assert_eq!(settings.timeout_secs, Some(10));
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = [").unwrap();
        assert!(Settings::from_file(&path).is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = Settings::default().with_env(env(&[(ENV_TIMEOUT, "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_require_api_key() {
        assert!(Settings::default().require_api_key().is_err());
        let settings = Settings::default()
            .with_env(env(&[(ENV_API_KEY, "k")]))
            .unwrap();
        assert_eq!(settings.require_api_key().unwrap(), "k");
    }

    #[test]
    fn test_transport_config() {
        let settings = Settings {
            endpoint: Some("http://localhost/main.asmx".to_string()),
            wsdl: Some("/tmp/legistar.wsdl".to_string()),
            timeout_secs: Some(5),
            ..Default::default()
        };
        let config = settings.transport_config();
        assert_eq!(config.endpoint, "http://localhost/main.asmx");
        assert_eq!(config.wsdl, Some(WsdlSource::Path(PathBuf::from("/tmp/legistar.wsdl"))));
        assert_eq!(config.timeout, Duration::from_secs(5));

        let settings = Settings {
            wsdl: Some("none".to_string()),
            ..Default::default()
        };
        assert!(settings.transport_config().wsdl.is_none());
    }

    #[test]
    fn test_masked_toml() {
        let settings = Settings {
            api_key: Some("secret".to_string()),
            government: Some("G-1".to_string()),
            ..Default::default()
        };
        let shown = settings.to_masked_toml().unwrap();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("G-1"));
    }
}

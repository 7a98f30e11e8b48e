use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::check::{CheckConfig, CheckConfigBuilder, DEFAULT_METHOD};

/// Defaults applied to every check, loaded from
/// `~/.config/healthgate/config.toml`. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Seconds to wait before sending the first request.
    pub initial_delay_secs: u64,
    /// Seconds to wait between tries.
    pub delay_between_tries_secs: u64,
    /// Number of tries before giving up (including the first).
    pub max_attempts: u32,
    /// Seconds allowed for each request, connection setup included.
    pub timeout_secs: u64,
    /// Status code that counts as healthy.
    pub expected_status: u32,
    /// Request method.
    #[serde(default = "default_method")]
    pub method: String,
    /// Follow 3xx redirects (up to 10 hops).
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    /// Headers sent with every request; command-line headers win on conflict.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

fn default_follow_redirects() -> bool {
    true
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: 0,
            delay_between_tries_secs: 5,
            max_attempts: 10,
            timeout_secs: 10,
            expected_status: 200,
            method: default_method(),
            follow_redirects: true,
            headers: BTreeMap::new(),
        }
    }
}

impl GateConfig {
    /// Builder for `target` pre-filled with these defaults.
    pub fn check_builder(&self, target: impl Into<String>) -> CheckConfigBuilder {
        CheckConfig::builder(target)
            .method(self.method.clone())
            .headers(self.headers.clone())
            .initial_delay(Duration::from_secs(self.initial_delay_secs))
            .inter_attempt_delay(Duration::from_secs(self.delay_between_tries_secs))
            .max_attempts(self.max_attempts)
            .per_attempt_timeout(Duration::from_secs(self.timeout_secs))
            .expected_status(self.expected_status)
            .follow_redirects(self.follow_redirects)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("healthgate")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GateConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` with an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<GateConfig> {
    if !path.exists() {
        let default_cfg = GateConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("writing default config to {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: GateConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = GateConfig::default();
        assert_eq!(cfg.initial_delay_secs, 0);
        assert_eq!(cfg.delay_between_tries_secs, 5);
        assert_eq!(cfg.max_attempts, 10);
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.expected_status, 200);
        assert_eq!(cfg.method, "GET");
        assert!(cfg.follow_redirects);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = GateConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: GateConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_toml_custom_values_and_headers() {
        let toml = r#"
            initial_delay_secs = 3
            delay_between_tries_secs = 1
            max_attempts = 20
            timeout_secs = 2
            expected_status = 204

            [headers]
            Host = "api.example.com"
        "#;
        let cfg: GateConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_attempts, 20);
        assert_eq!(cfg.expected_status, 204);
        assert_eq!(cfg.method, "GET");
        assert!(cfg.follow_redirects);
        assert_eq!(cfg.headers.get("Host").map(String::as_str), Some("api.example.com"));
    }

    #[test]
    fn check_builder_applies_defaults() {
        let mut cfg = GateConfig::default();
        cfg.timeout_secs = 3;
        cfg.headers.insert("X-Gate".into(), "1".into());
        let check = cfg.check_builder("http://127.0.0.1/ok").build().unwrap();
        assert_eq!(check.per_attempt_timeout(), Duration::from_secs(3));
        assert_eq!(check.inter_attempt_delay(), Duration::from_secs(5));
        assert_eq!(check.headers().get("x-gate"), Some("1"));
    }

    #[test]
    fn zero_timeout_in_file_is_rejected_at_build() {
        let mut cfg = GateConfig::default();
        cfg.timeout_secs = 0;
        assert!(cfg.check_builder("http://127.0.0.1/").build().is_err());
    }

    #[test]
    fn load_or_init_creates_then_reads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, GateConfig::default());

        fs::write(
            &path,
            "initial_delay_secs = 0\ndelay_between_tries_secs = 2\nmax_attempts = 4\ntimeout_secs = 1\nexpected_status = 200\n",
        )
        .unwrap();
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.max_attempts, 4);
        assert_eq!(loaded.delay_between_tries_secs, 2);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_attempts = \"many\"").unwrap();
        let err = load_or_init_at(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config"));
    }
}

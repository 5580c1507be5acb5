use std::path::Path;

use anyhow::{bail, Context};
use toml::{map::Map, Value};

use crate::load_config;

pub const DEFAULT_DEV_SERVER: &str = "http://localhost:5173";
pub const DEFAULT_API_TARGET: &str = "http://localhost:8000";
pub const PRODUCTION_PLACEHOLDER: &str = "https://your-production-api.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Proxy prefixes served by the development server.
pub const PROXY_PREFIXES: [&str; 4] = ["/api", "/ws", "/static", "/media"];

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    #[default]
    #[strum(to_string = "development", serialize = "dev")]
    Development,
    #[strum(to_string = "production", serialize = "prod")]
    Production,
}

/// Startup configuration. Read once, then passed by value; nothing re-reads
/// the environment afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub debug_mode: bool,
    pub dev_server: String,
    pub api_target: String,
    pub timeout_secs: u64,
    pub api_base_url: Option<String>,
    pub ws_base_url: Option<String>,
    pub static_base_url: Option<String>,
    pub media_base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            debug_mode: false,
            dev_server: DEFAULT_DEV_SERVER.to_string(),
            api_target: DEFAULT_API_TARGET.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_base_url: None,
            ws_base_url: None,
            static_base_url: None,
            media_base_url: None,
        }
    }
}

impl Config {
    /// Reads the optional TOML file, then lets `BLOG_*` environment
    /// variables override it.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml(&load_config(path)?)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    pub fn from_toml(map: &Map<String, Value>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(mode) = get_str(map, "app", "mode")? {
            config.mode = mode
                .parse()
                .with_context(|| format!("failed to parse mode {}", mode))?;
        }
        if let Some(debug_mode) = get_bool(map, "app", "debug_mode")? {
            config.debug_mode = debug_mode;
        }
        if let Some(dev_server) = get_str(map, "app", "dev_server")? {
            config.dev_server = dev_server;
        }
        if let Some(target) = get_str(map, "api", "target")? {
            config.api_target = target;
        }
        if let Some(timeout_secs) = get_integer(map, "api", "timeout_secs")? {
            if timeout_secs <= 0 {
                bail!("timeout_secs must be positive, got {}", timeout_secs);
            }
            config.timeout_secs = timeout_secs as u64;
        }
        config.api_base_url = get_str(map, "api", "base_url")?;
        config.ws_base_url = get_str(map, "ws", "base_url")?;
        config.static_base_url = get_str(map, "static", "base_url")?;
        config.media_base_url = get_str(map, "media", "base_url")?;

        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("BLOG_MODE") {
            self.mode = mode
                .parse()
                .with_context(|| format!("failed to parse BLOG_MODE {}", mode))?;
        }
        if let Some(debug_mode) = lookup("BLOG_DEBUG_MODE") {
            self.debug_mode = debug_mode == "true";
        }
        if let Some(dev_server) = lookup("BLOG_DEV_SERVER") {
            self.dev_server = dev_server;
        }
        if let Some(target) = lookup("BLOG_API_TARGET") {
            self.api_target = target;
        }
        if let Some(url) = lookup("BLOG_API_BASE_URL") {
            self.api_base_url = Some(url);
        }
        if let Some(url) = lookup("BLOG_WS_BASE_URL") {
            self.ws_base_url = Some(url);
        }
        if let Some(url) = lookup("BLOG_STATIC_BASE_URL") {
            self.static_base_url = Some(url);
        }
        if let Some(url) = lookup("BLOG_MEDIA_BASE_URL") {
            self.media_base_url = Some(url);
        }

        Ok(())
    }

    /// Development goes through the local proxy; production talks to the
    /// configured origin.
    pub fn api_base_url(&self) -> String {
        match self.mode {
            Mode::Development => join(&self.dev_server, "/api"),
            Mode::Production => self
                .api_base_url
                .clone()
                .unwrap_or_else(|| PRODUCTION_PLACEHOLDER.to_string()),
        }
    }

    pub fn ws_base_url(&self) -> String {
        match (self.mode, &self.ws_base_url) {
            (Mode::Production, Some(url)) => url.clone(),
            (Mode::Production, None) => {
                to_ws_scheme(&join(&self.api_base_url(), "/ws"))
            }
            (Mode::Development, _) => {
                to_ws_scheme(&join(&self.dev_server, "/ws"))
            }
        }
    }

    pub fn static_base_url(&self) -> String {
        self.asset_base_url(&self.static_base_url, "/static")
    }

    pub fn media_base_url(&self) -> String {
        self.asset_base_url(&self.media_base_url, "/media")
    }

    fn asset_base_url(&self, configured: &Option<String>, path: &str) -> String {
        match (self.mode, configured) {
            (Mode::Production, Some(url)) => url.clone(),
            (Mode::Production, None) => join(&self.api_base_url(), path),
            (Mode::Development, _) => join(&self.dev_server, path),
        }
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn to_ws_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        url.to_string()
    }
}

fn get<'a>(
    map: &'a Map<String, Value>,
    table: &str,
    key: &str,
) -> Option<&'a Value> {
    map.get(table).and_then(|t| t.get(key))
}

fn get_str(
    map: &Map<String, Value>,
    table: &str,
    key: &str,
) -> anyhow::Result<Option<String>> {
    get(map, table, key)
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .with_context(|| format!("failed to parse {}.{}", table, key))
        })
        .transpose()
}

fn get_bool(
    map: &Map<String, Value>,
    table: &str,
    key: &str,
) -> anyhow::Result<Option<bool>> {
    get(map, table, key)
        .map(|v| {
            v.as_bool()
                .with_context(|| format!("failed to parse {}.{}", table, key))
        })
        .transpose()
}

fn get_integer(
    map: &Map<String, Value>,
    table: &str,
    key: &str,
) -> anyhow::Result<Option<i64>> {
    get(map, table, key)
        .map(|v| {
            v.as_integer()
                .with_context(|| format!("failed to parse {}.{}", table, key))
        })
        .transpose()
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn from_str(toml: &str) -> anyhow::Result<Config> {
        let map = toml::from_str::<Map<String, Value>>(toml)?;
        Config::from_toml(&map)
    }

    #[test]
    fn test_defaults_resolve_to_dev_proxy() {
        let config = Config::default();

        assert_eq!(config.api_base_url(), "http://localhost:5173/api");
        assert_eq!(config.ws_base_url(), "ws://localhost:5173/ws");
        assert_eq!(config.static_base_url(), "http://localhost:5173/static");
        assert_eq!(config.media_base_url(), "http://localhost:5173/media");
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_production_falls_back_to_placeholder() {
        let config = Config {
            mode: Mode::Production,
            ..Default::default()
        };

        assert_eq!(config.api_base_url(), PRODUCTION_PLACEHOLDER);
        assert_eq!(
            config.ws_base_url(),
            "wss://your-production-api.com/ws"
        );
    }

    #[test]
    fn test_from_toml() {
        // Arrange
        let toml = r#"
            [app]
            mode = "production"
            debug_mode = true

            [api]
            base_url = "https://api.example.com/"
            target = "http://backend:8000"
            timeout_secs = 5

            [media]
            base_url = "https://cdn.example.com/media"
        "#;

        // Act
        let config = from_str(toml).unwrap();

        // Assert
        assert_eq!(config.mode, Mode::Production);
        assert!(config.debug_mode);
        assert_eq!(config.api_target, "http://backend:8000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.api_base_url(), "https://api.example.com/");
        assert_eq!(config.media_base_url(), "https://cdn.example.com/media");
        assert_eq!(
            config.static_base_url(),
            "https://api.example.com/static"
        );
    }

    #[rstest]
    #[case("[app]\nmode = 3")]
    #[case("[app]\nmode = \"staging\"")]
    #[case("[api]\ntimeout_secs = 0")]
    #[case("[app]\ndebug_mode = \"yes\"")]
    fn test_from_toml_rejects_bad_values(#[case] toml: &str) {
        assert!(from_str(toml).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        // Arrange
        let mut config = from_str("[app]\nmode = \"development\"").unwrap();
        let env = HashMap::from([
            ("BLOG_MODE", "prod"),
            ("BLOG_API_BASE_URL", "https://blog.example.com"),
            ("BLOG_DEBUG_MODE", "true"),
        ]);

        // Act
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        // Assert
        assert_eq!(config.mode, Mode::Production);
        assert!(config.debug_mode);
        assert_eq!(config.api_base_url(), "https://blog.example.com");
    }

    #[rstest]
    #[case("true", true)]
    #[case("TRUE", false)]
    #[case("1", false)]
    fn test_debug_mode_flag(#[case] value: &str, #[case] expected: bool) {
        let mut config = Config::default();

        config
            .apply_env(|key| (key == "BLOG_DEBUG_MODE").then(|| value.into()))
            .unwrap();

        assert_eq!(config.debug_mode, expected);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("DEV".parse::<Mode>().unwrap(), Mode::Development);
        assert_eq!("production".parse::<Mode>().unwrap(), Mode::Production);
        assert_eq!(Mode::Production.to_string(), "production");
    }
}

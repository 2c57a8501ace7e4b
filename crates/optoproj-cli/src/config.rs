//! Settings resolution for the CLI.
//!
//! Precedence: command-line flag > environment variable > `config.toml`
//! `[optoma]` table > built-in default.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use optoproj_client::config::{defaults, env_vars};
use optoproj_client::ClientConfig;
use optoproj_integration::EntryData;
use serde::Deserialize;
use tracing::{debug, warn};

/// Top-level layout of `config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub optoma: Option<OptomaSection>,
}

/// `[optoma]` table.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OptomaSection {
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub base_url: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: EntryData,
    pub client: ClientConfig,
}

/// Parse a TOML document.
pub fn parse_toml(content: &str) -> Result<OptomaSection> {
    let config: TomlConfig = toml::from_str(content).context("Invalid config.toml")?;
    Ok(config.optoma.unwrap_or_default())
}

/// Load the `[optoma]` table.
///
/// An explicitly given path must exist. The default path is optional.
pub fn load_file(path: Option<&Path>) -> Result<OptomaSection> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(defaults::CONFIG_FILE), false),
    };

    if !path.exists() {
        if explicit {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
        debug!(path = %path.display(), "No config file, using environment and flags");
        return Ok(OptomaSection::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    debug!(path = %path.display(), "Loading config file");
    parse_toml(&content)
}

/// Merge flags, environment and file into settings.
pub fn resolve(
    overrides: Overrides,
    env: impl Fn(&str) -> Option<String>,
    file: OptomaSection,
) -> Result<Settings> {
    let username = overrides
        .username
        .or_else(|| env(env_vars::USERNAME))
        .or(file.username)
        .ok_or_else(|| {
            anyhow!(
                "No username configured. Use --username, set {} or add it to config.toml",
                env_vars::USERNAME
            )
        })?;

    let password = overrides
        .password
        .or_else(|| env(env_vars::PASSWORD))
        .or(file.password)
        .ok_or_else(|| {
            anyhow!(
                "No password configured. Use --password, set {} or add it to config.toml",
                env_vars::PASSWORD
            )
        })?;

    let mut client = ClientConfig::default();

    if let Some(base_url) = overrides
        .base_url
        .or_else(|| env(env_vars::BASE_URL))
        .or(file.base_url)
    {
        client = client.with_base_url(base_url);
    }

    let env_timeout = env(env_vars::TIMEOUT_SECS).and_then(|v| match v.parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!(value = %v, "Ignoring invalid {}", env_vars::TIMEOUT_SECS);
            None
        }
    });
    if let Some(timeout_secs) = env_timeout.or(file.timeout_secs) {
        client = client.with_timeout_secs(timeout_secs);
    }

    Ok(Settings {
        credentials: EntryData { username, password },
        client,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_toml() {
        let section = parse_toml(
            r#"
            [optoma]
            username = "file@example.com"
            password = "from-file"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(section.username.as_deref(), Some("file@example.com"));
        assert_eq!(section.timeout_secs, Some(5));
        assert_eq!(section.base_url, None);
    }

    #[test]
    fn test_parse_toml_without_section() {
        let section = parse_toml("[other]\nkey = 1\n").unwrap();
        assert!(section.username.is_none());
        assert!(parse_toml("not = [valid").is_err());
    }

    #[test]
    fn test_resolve_precedence() {
        let file = OptomaSection {
            username: Some("file@example.com".into()),
            password: Some("from-file".into()),
            base_url: Some("http://file.test".into()),
            timeout_secs: Some(5),
        };
        let env = env_from(&[
            ("OPTOMA_USERNAME", "env@example.com"),
            ("OPTOMA_TIMEOUT_SECS", "7"),
        ]);
        let overrides = Overrides {
            base_url: Some("http://flag.test/".into()),
            ..Default::default()
        };

        let settings = resolve(overrides, env, file).unwrap();

        assert_eq!(settings.credentials.username, "env@example.com");
        assert_eq!(settings.credentials.password, "from-file");
        assert_eq!(settings.client.base_url, "http://flag.test");
        assert_eq!(settings.client.timeout_secs, 7);
    }

    #[test]
    fn test_resolve_defaults() {
        let overrides = Overrides {
            username: Some("user@example.com".into()),
            password: Some("secret".into()),
            ..Default::default()
        };

        let settings = resolve(overrides, env_from(&[]), OptomaSection::default()).unwrap();
        assert_eq!(settings.client.base_url, "https://omw.optoma.com");
        assert_eq!(settings.client.timeout_secs, 30);
    }

    #[test]
    fn test_resolve_missing_credentials() {
        let err = resolve(
            Overrides::default(),
            env_from(&[("OPTOMA_PASSWORD", "secret")]),
            OptomaSection::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("OPTOMA_USERNAME"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[optoma]\nusername = \"a\"\npassword = \"b\"\n").unwrap();

        let section = load_file(Some(&path)).unwrap();
        assert_eq!(section.password.as_deref(), Some("b"));

        assert!(load_file(Some(&dir.path().join("missing.toml"))).is_err());
    }
}

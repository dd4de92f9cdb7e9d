// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use flexrule_app::{DEFAULT_ASSET_BASE_URL, FALLBACK_LANGUAGE};
use flexrule_engine::InactiveCauseMode;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "flexrule";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_CACHE_TTL: &str = "60m";
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: Catalog::default(),
            engine: Engine::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub cache_ttl: Option<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            base_url: Some(DEFAULT_ASSET_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            cache_ttl: Some(DEFAULT_CACHE_TTL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Engine {
    pub language: Option<String>,
    pub include_defaults: Option<bool>,
    pub defaults_version: Option<String>,
    pub inactive_causes: Option<String>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            language: Some(FALLBACK_LANGUAGE.to_owned()),
            include_defaults: Some(true),
            defaults_version: None,
            inactive_causes: Some(InactiveCauseMode::ForceFalse.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("FLEXRULE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set FLEXRULE_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [catalog], [engine], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.catalog.base_url {
            flexrule_catalog::parse_base_url(base_url)
                .with_context(|| format!("invalid [catalog] in {}", path.display()))?;
        }

        if let Some(timeout) = &self.catalog.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed.is_zero() {
                bail!(
                    "catalog.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(ttl) = &self.catalog.cache_ttl {
            parse_duration(ttl)?;
        }

        if let Some(language) = &self.engine.language
            && language.trim().is_empty()
        {
            bail!("engine.language in {} must not be empty", path.display());
        }

        if let Some(version) = &self.engine.defaults_version {
            flexrule_catalog::validate_version(version)
                .with_context(|| format!("invalid engine.defaults_version in {}", path.display()))?;
        }

        if let Some(mode) = &self.engine.inactive_causes
            && InactiveCauseMode::parse(mode).is_none()
        {
            bail!(
                "engine.inactive_causes in {} must be \"force_false\" or \"exclude\", got {:?}",
                path.display(),
                mode
            );
        }

        if let Some(level) = &self.logging.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "logging.level in {} must be one of {}, got {:?}",
                path.display(),
                LOG_LEVELS.join(", "),
                level
            );
        }

        Ok(())
    }

    pub fn catalog_enabled(&self) -> bool {
        self.catalog.enabled.unwrap_or(true)
    }

    pub fn catalog_base_url(&self) -> &str {
        self.catalog
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_ASSET_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn catalog_timeout(&self) -> Result<Duration> {
        parse_duration(self.catalog.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn catalog_cache_ttl(&self) -> Result<Duration> {
        parse_duration(self.catalog.cache_ttl.as_deref().unwrap_or(DEFAULT_CACHE_TTL))
    }

    pub fn language(&self) -> &str {
        self.engine.language.as_deref().unwrap_or(FALLBACK_LANGUAGE)
    }

    pub fn include_defaults(&self) -> bool {
        self.engine.include_defaults.unwrap_or(true)
    }

    pub fn defaults_version(&self) -> Option<&str> {
        self.engine
            .defaults_version
            .as_deref()
            .filter(|version| !version.is_empty())
    }

    pub fn inactive_causes(&self) -> InactiveCauseMode {
        self.engine
            .inactive_causes
            .as_deref()
            .and_then(InactiveCauseMode::parse)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# flexrule config\n# Place this file at: {}\n\nversion = 1\n\n[catalog]\n# Remote flex features and default effects.\nenabled = true\nbase_url = \"{}\"\ntimeout = \"{}\"\ncache_ttl = \"{}\"\n\n[engine]\nlanguage = \"{}\"\ninclude_defaults = true\n# Pin a default effects version instead of the active one.\n# defaults_version = \"2024-06-01\"\n# force_false: an inactive cause is a false term. exclude: it is skipped.\ninactive_causes = \"force_false\"\n\n[logging]\n# error, warn, info, debug or trace. RUST_LOG overrides this.\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_ASSET_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_CACHE_TTL,
            FALLBACK_LANGUAGE,
            DEFAULT_LOG_LEVEL,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins.saturating_mul(60)));
    }
    if let Some(value) = raw.strip_suffix('h') {
        let hours: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(hours.saturating_mul(3600)));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m, <N>h (for example 500ms or 5s)")
}

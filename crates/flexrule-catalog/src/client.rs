// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use flexrule_app::{Effect, nav_icon_url};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::flex::{FlexFeatures, default_effects_from_value};

const FLEX_FEATURES_PATH: &str = "flex/flexFeatures.json";
const DEFAULT_EFFECTS_PATH: &str = "flex/defaultEffects.json";

/// Blocking client for the flex catalog served under one base URL.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: Url,
    http: HttpClient,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn fetch_flex_features(&self) -> Result<FlexFeatures> {
        self.get_json(FLEX_FEATURES_PATH)
            .context("fetch flex features")
    }

    /// Active defaults, or a pinned version when `version` is set.
    pub fn fetch_default_effects(&self, version: Option<&str>) -> Result<Vec<Effect>> {
        let path = match version {
            Some(version) => {
                validate_version(version)?;
                format!("flex/defaultEffects/{version}.json")
            }
            None => DEFAULT_EFFECTS_PATH.to_owned(),
        };
        let label = version.unwrap_or("(active)");
        let document: Value = self
            .get_json(&path)
            .with_context(|| format!("fetch default effects {label}"))?;
        default_effects_from_value(document)
            .with_context(|| format!("read default effects {label}"))
    }

    pub fn icon_url(&self, web_screen_key: &str) -> String {
        nav_icon_url(self.base_url(), web_screen_key)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("build catalog URL for {path}"))?;
        debug!(url = %url, "fetching catalog document");

        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|error| connection_error(self.base_url(), error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response
            .json()
            .with_context(|| format!("decode catalog document {url}"))
    }
}

/// Normalizes a catalog base URL so relative joins land beneath it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("catalog.base_url must not be empty");
    }
    let mut url =
        Url::parse(trimmed).with_context(|| format!("catalog.base_url {trimmed:?} is invalid"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "catalog.base_url must use http or https, got {:?}",
            url.scheme()
        );
    }
    if url.query().is_some() || url.fragment().is_some() {
        bail!("catalog.base_url must not carry a query or fragment");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Version ids become a path segment, so they are limited to a safe alphabet.
pub fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        bail!("default effects version must not be empty");
    }
    if version.starts_with('.')
        || !version
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
    {
        bail!("default effects version {version:?} contains unsupported characters");
    }
    Ok(())
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach catalog at {} -- check catalog.base_url or set catalog.enabled = false ({})",
        base_url,
        error
    )
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message.or(parsed.error)
        && !message.is_empty()
    {
        return anyhow!("catalog error ({}): {}", status.as_u16(), message);
    }

    // S3-style XML error bodies are too noisy to show.
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.starts_with(['{', '<']) {
        return anyhow!("catalog error ({}): {}", status.as_u16(), trimmed);
    }

    anyhow!("catalog returned {}", status.as_u16())
}

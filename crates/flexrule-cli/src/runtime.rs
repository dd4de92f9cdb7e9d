// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context as _, Result, anyhow, bail};
use flexrule_app::{Context, DEFAULT_ASSET_BASE_URL, Rule, parse_entries};
use flexrule_catalog::{CatalogClient, RemoteCatalog, parse_default_effects};
use flexrule_engine::{
    DefaultEffectsSource, InactiveCauseMode, NoDefaultEffects, RenderReport, RenderRequest,
    RuleEngine, StaticDefaultEffects,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::Config;

/// Collaborators resolved from config and command-line overrides.
pub struct Runtime {
    catalog: Option<RemoteCatalog>,
    file_defaults: Option<StaticDefaultEffects>,
    inactive_causes: InactiveCauseMode,
}

impl Runtime {
    pub fn from_config(config: &Config, defaults_file: Option<&Path>) -> Result<Self> {
        let catalog = if config.catalog_enabled() {
            let client = CatalogClient::new(config.catalog_base_url(), config.catalog_timeout()?)
                .context("invalid [catalog] config; fix base_url/timeout values")?;
            Some(RemoteCatalog::new(client, config.catalog_cache_ttl()?))
        } else {
            None
        };

        let file_defaults = defaults_file
            .map(load_default_effects)
            .transpose()?
            .map(StaticDefaultEffects::new);

        Ok(Self {
            catalog,
            file_defaults,
            inactive_causes: config.inactive_causes(),
        })
    }

    pub fn engine(&self) -> RuleEngine<'_> {
        let defaults: &dyn DefaultEffectsSource = match (&self.file_defaults, &self.catalog) {
            (Some(file), _) => file,
            (None, Some(catalog)) => catalog,
            (None, None) => &NoDefaultEffects,
        };

        let engine = RuleEngine::new(defaults).with_inactive_causes(self.inactive_causes);
        match &self.catalog {
            Some(catalog) => engine
                .with_tabs(catalog)
                .with_asset_base_url(catalog.client().base_url()),
            None => engine.with_asset_base_url(DEFAULT_ASSET_BASE_URL),
        }
    }

    pub fn render(
        &self,
        rules: &[Rule],
        context: &Context,
        request: &RenderRequest<'_>,
    ) -> RenderReport {
        self.engine().render(rules, context, request)
    }
}

/// Accepts a bare array of rules or `{"rules": [...]}`. Entries that do
/// not parse are logged and skipped.
pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    let raw = read_file(path, "rules")?;
    let document: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parse rules file {}", path.display()))?;
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("rules") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(rules_shape_error(path)),
        },
        _ => return Err(rules_shape_error(path)),
    };

    let total = entries.len();
    let rules: Vec<Rule> = parse_entries(entries, "rule");
    debug!(
        path = %path.display(),
        rules = rules.len(),
        skipped = total - rules.len(),
        active = rules.iter().filter(|rule| rule.active).count(),
        "loaded rules"
    );
    Ok(rules)
}

fn rules_shape_error(path: &Path) -> anyhow::Error {
    anyhow!(
        "rules file {}: expected a JSON array of rules or {{\"rules\": [...]}}",
        path.display()
    )
}

pub fn load_context(path: &Path) -> Result<Context> {
    let raw = read_file(path, "context")?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("parse context file {}", path.display()))?;
    Context::from_value(value).with_context(|| format!("load context file {}", path.display()))
}

pub fn load_default_effects(path: &Path) -> Result<Vec<flexrule_app::Effect>> {
    let raw = read_file(path, "default effects")?;
    parse_default_effects(&raw).with_context(|| format!("load {}", path.display()))
}

fn read_file(path: &Path, kind: &str) -> Result<String> {
    if !path.is_file() {
        bail!("{kind} file {} does not exist", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("read {kind} file {}", path.display()))
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use flexrule_app::{Effect, parse_entries};
use flexrule_engine::{DefaultEffectsSource, TabActionConfig, TabResolver};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::cache::TtlCache;
use crate::client::CatalogClient;

/// The flex features document. Entries stay raw until looked up so one
/// malformed tab action does not poison the rest.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexFeatures {
    #[serde(default)]
    pub tab_item: BTreeMap<String, Value>,
}

impl FlexFeatures {
    pub fn tab_action(&self, tab_id: &str) -> Option<TabActionConfig> {
        let raw = self.tab_item.get(tab_id)?;
        match serde_json::from_value(raw.clone()) {
            Ok(config) => Some(config),
            Err(error) => {
                warn!(tab = tab_id, %error, "malformed tab action entry");
                None
            }
        }
    }
}

/// Default effects arrive either as a bare list or wrapped in `effects`.
/// Effects that do not parse are logged and skipped.
pub fn default_effects_from_value(document: Value) -> Result<Vec<Effect>> {
    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("effects") {
            Some(Value::Array(entries)) => entries,
            None | Some(Value::Null) => Vec::new(),
            Some(_) => bail!("default effects document has a non-list `effects` field"),
        },
        _ => bail!("default effects document must be a list or an object with `effects`"),
    };
    Ok(parse_entries(entries, "default effect"))
}

pub fn parse_default_effects(body: &str) -> Result<Vec<Effect>> {
    let document: Value =
        serde_json::from_str(body).context("parse default effects document")?;
    default_effects_from_value(document)
}

/// Catalog-backed collaborators for the rule engine, cached per TTL.
#[derive(Debug)]
pub struct RemoteCatalog {
    client: CatalogClient,
    flex: TtlCache<(), FlexFeatures>,
    defaults: TtlCache<Option<String>, Vec<Effect>>,
}

impl RemoteCatalog {
    pub fn new(client: CatalogClient, ttl: std::time::Duration) -> Self {
        let ttl = time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX);
        Self {
            client,
            flex: TtlCache::new(ttl),
            defaults: TtlCache::new(ttl),
        }
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn flex_features(&self) -> Result<FlexFeatures> {
        self.flex
            .get_or_fetch((), || self.client.fetch_flex_features())
    }

    pub fn invalidate(&self) {
        self.flex.clear();
        self.defaults.clear();
    }
}

impl TabResolver for RemoteCatalog {
    fn tab_action_config(&self, tab_id: &str) -> Option<TabActionConfig> {
        match self.flex_features() {
            Ok(features) => features.tab_action(tab_id),
            Err(error) => {
                warn!(tab = tab_id, error = %format!("{error:#}"), "flex features unavailable");
                None
            }
        }
    }

    fn resolve_tab_icon(&self, web_screen_key: &str) -> String {
        self.client.icon_url(web_screen_key)
    }
}

impl DefaultEffectsSource for RemoteCatalog {
    fn default_effects(&self, version: Option<&str>) -> Result<Vec<Effect>> {
        self.defaults.get_or_fetch(version.map(str::to_owned), || {
            self.client.fetch_default_effects(version)
        })
    }
}

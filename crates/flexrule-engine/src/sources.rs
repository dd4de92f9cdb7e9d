// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use flexrule_app::Effect;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Supplies the unconditional effects applied before any rule.
pub trait DefaultEffectsSource {
    fn default_effects(&self, version: Option<&str>) -> Result<Vec<Effect>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaultEffects;

impl DefaultEffectsSource for NoDefaultEffects {
    fn default_effects(&self, _version: Option<&str>) -> Result<Vec<Effect>> {
        Ok(Vec::new())
    }
}

/// A fixed default set, for hosts that load defaults from a file.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaultEffects {
    effects: Vec<Effect>,
}

impl StaticDefaultEffects {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }
}

impl DefaultEffectsSource for StaticDefaultEffects {
    fn default_effects(&self, _version: Option<&str>) -> Result<Vec<Effect>> {
        Ok(self.effects.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabLocale {
    #[serde(default)]
    pub tab_item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabConfig {
    #[serde(default)]
    pub web_screen_key: Option<String>,
}

/// A tab action entry from the flex features catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TabActionConfig {
    #[serde(default)]
    pub locale: BTreeMap<String, TabLocale>,
    #[serde(default)]
    pub config: Option<TabConfig>,
}

impl TabActionConfig {
    pub fn label_for(&self, language: &str) -> Option<&str> {
        self.locale
            .get(language)
            .and_then(|locale| locale.tab_item.as_deref())
            .filter(|label| !label.is_empty())
    }

    pub fn web_screen_key(&self) -> Option<&str> {
        self.config
            .as_ref()
            .and_then(|config| config.web_screen_key.as_deref())
            .filter(|key| !key.is_empty())
    }
}

/// Resolves replacement bottom tabs.
pub trait TabResolver {
    fn tab_action_config(&self, tab_id: &str) -> Option<TabActionConfig>;

    fn resolve_tab_icon(&self, web_screen_key: &str) -> String;
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context as _, Result, bail};
use flexrule_app::{Context, Effect, Rule, nav_icon_url};
use flexrule_engine::{DefaultEffectsSource, TabActionConfig, TabResolver};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

const HOME_TYPES: [&str; 5] = ["house", "flat", "villa", "cottage", "bungalow"];
const OWNERSHIP_TYPES: [&str; 3] = ["owner", "renter", "landlord"];
const COUNTRIES: [&str; 6] = ["GB", "ES", "FR", "DE", "IT", "NL"];
const LANGUAGES: [&str; 6] = ["en-GB", "es", "fr", "de", "it", "nl"];
const PARTNERS: [&str; 4] = ["Acme Insurance", "Brightside", "Homely", "Keystone"];
const SUBTABS: [&str; 3] = ["expenses-all", "expenses-trackers", "expenses-bills"];

pub const FIXTURE_ASSET_BASE_URL: &str = "https://assets.flexrule.test";

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator of realistic render contexts.
#[derive(Debug, Clone)]
pub struct ContextFaker {
    rng: DeterministicRng,
}

impl ContextFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn context(&mut self) -> Context {
        let mut context = Context::new()
            .with_section("user", self.user())
            .with_section("home", self.home())
            .with_section("userActivity", self.user_activity());
        if self.rng.bool() {
            context = context.with_section("homeActivity", self.home_activity());
        }
        if self.rng.bool() {
            context = context.with_section(
                "expensesScreen",
                json!({ "activeSubtab": self.pick(&SUBTABS) }),
            );
        }
        context
    }

    fn user(&mut self) -> Value {
        let partner = if self.rng.bool() {
            json!({ "name": self.pick(&PARTNERS) })
        } else {
            Value::Null
        };
        json!({
            "partner": partner,
            "countryISO": self.pick(&COUNTRIES),
            "language": self.pick(&LANGUAGES),
            "premium": self.rng.bool(),
        })
    }

    fn home(&mut self) -> Value {
        json!({
            "type": self.pick(&HOME_TYPES),
            "ownershipType": self.pick(&OWNERSHIP_TYPES),
            "bedrooms": self.int_range(1, 6),
        })
    }

    fn user_activity(&mut self) -> Value {
        json!({
            "homesCount": self.int_range(1, 3),
            "cardsCount": self.int_range(0, 40),
            "appOpened": self.int_range(1, 200),
        })
    }

    fn home_activity(&mut self) -> Value {
        json!({
            "inboxEmailed": self.int_range(0, 12),
            "documentsCount": self.int_range(0, 80),
        })
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }

    fn int_range(&mut self, low: usize, high: usize) -> usize {
        low + self.rng.int_n(high - low + 1)
    }
}

/// The context used by the end-to-end render scenarios.
pub fn house_context() -> Context {
    Context::new()
        .with_section("user", json!({ "partner": null }))
        .with_section("home", json!({ "type": "house" }))
}

pub fn expenses_context(subtab: &str) -> Context {
    house_context().with_section("expensesScreen", json!({ "activeSubtab": subtab }))
}

pub fn rules_from_json(value: Value) -> Result<Vec<Rule>> {
    serde_json::from_value(value).context("parse rule fixtures")
}

pub fn effects_from_json(value: Value) -> Result<Vec<Effect>> {
    serde_json::from_value(value).context("parse effect fixtures")
}

/// Active rule with no causes that replaces the shortcuts list.
pub fn shortcuts_rule(name: &str, shortcuts: &[&str]) -> Result<Rule> {
    let rule = json!({
        "name": name,
        "active": true,
        "causes": [],
        "effects": [{ "action": "showContent", "target": "shortcuts", "data": { "value": shortcuts } }],
    });
    serde_json::from_value(rule).context("parse shortcuts rule")
}

/// Serves tab actions from an in-memory flex features table.
#[derive(Debug, Clone, Default)]
pub struct StaticTabResolver {
    tabs: BTreeMap<String, TabActionConfig>,
}

impl StaticTabResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(mut self, tab_id: &str, config: Value) -> Result<Self> {
        let config = serde_json::from_value(config)
            .with_context(|| format!("parse tab action config for {tab_id}"))?;
        self.tabs.insert(tab_id.to_owned(), config);
        Ok(self)
    }

    pub fn fire_safety() -> Result<Self> {
        Self::new().with_tab(
            "fireSafety",
            json!({
                "locale": {
                    "en-GB": { "tabItem": "Fire safety" },
                    "es": { "tabItem": "Seguridad" },
                },
                "config": { "webScreenKey": "fireSafety" },
            }),
        )
    }
}

impl TabResolver for StaticTabResolver {
    fn tab_action_config(&self, tab_id: &str) -> Option<TabActionConfig> {
        self.tabs.get(tab_id).cloned()
    }

    fn resolve_tab_icon(&self, web_screen_key: &str) -> String {
        nav_icon_url(FIXTURE_ASSET_BASE_URL, web_screen_key)
    }
}

/// Default-effects source that always errors, as an unreachable catalog does.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingDefaults;

impl DefaultEffectsSource for FailingDefaults {
    fn default_effects(&self, version: Option<&str>) -> Result<Vec<Effect>> {
        bail!(
            "default effects {} unavailable",
            version.unwrap_or("active")
        )
    }
}

/// A flex features document with one tab action and its web screen.
pub fn sample_flex_features() -> Value {
    json!({
        "tabItem": {
            "fireSafety": {
                "type": "tab",
                "locale": { "en-GB": { "tabItem": "Fire safety" }, "fr": { "tabItem": "Sécurité" } },
                "config": { "webScreenKey": "fireSafety" },
            },
            "broken": { "locale": {} },
        },
        "webScreen": {
            "fireSafety": { "url": "/fire-safety" },
        },
    })
}

pub fn sample_default_effects() -> Value {
    json!([
        { "action": "display", "target": "header.avatars", "data": { "value": true } },
        { "action": "showContent", "target": "shortcuts", "data": { "value": ["addDocument", "scan"] } },
        { "action": "display", "target": "quickActions", "screen": "inventory", "data": { "value": true } },
    ])
}

/// Writes `value` as pretty JSON into a fresh temp dir.
pub fn temp_json_file(name: &str, value: &Value) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(name);
    let body = serde_json::to_string_pretty(value).context("serialize fixture")?;
    std::fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

pub fn context_sections(context: &Context) -> Map<String, Value> {
    context
        .section_names()
        .filter_map(|name| {
            let section = flexrule_app::ContextSection::parse(name)?;
            Some((name.to_owned(), context.section(section)?.clone()))
        })
        .collect()
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Authoring formats for rules, causes and effects as they arrive from the
//! rules store, and their conversion into the normalized model types.
//! Mistyped fields read as absent so one bad record never sinks a whole set.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::{
    ActionKind, Condition, DisplayTarget, Effect, EffectAction, FilterDirective, HeaderField,
    InventoryDisplayType, ListTarget, LogicalOperator, Operator, QuickActionsLayout, Rule,
    StyleChange, TabAssignment, TabDirective,
};

/// Keeps an explicit JSON `null` as `Some(Value::Null)`; absence stays `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A value of the wrong type is treated as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn list_entries(value: Value, kind: &str) -> Vec<Value> {
    match value {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        other => {
            warn!(kind, value = %other, "expected a list, treating as empty");
            Vec::new()
        }
    }
}

/// Parses each entry on its own; entries that do not parse are logged and
/// skipped.
pub fn parse_entries<T: DeserializeOwned>(entries: Vec<Value>, kind: &str) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                warn!(kind, index, %error, "skipping malformed entry");
                None
            }
        })
        .collect()
}

/// A cause that is not even an object stays in the chain as a term that
/// never holds.
fn cause_list<'de, D>(deserializer: D) -> Result<Vec<Condition>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = list_entries(Value::deserialize(deserializer)?, "cause");
    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value(entry).unwrap_or_else(|error| {
                warn!(index, %error, "malformed cause, treating it as false");
                Condition::from(RawCause::default())
            })
        })
        .collect())
}

fn effect_list<'de, D>(deserializer: D) -> Result<Vec<Effect>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = list_entries(Value::deserialize(deserializer)?, "effect");
    Ok(parse_entries(entries, "effect"))
}

/// JSON truthiness: `false`, `0`, `""` and `null` are falsy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|raw| raw != 0.0 && !raw.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRule {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<Value>,
    #[serde(default, deserialize_with = "cause_list")]
    pub causes: Vec<Condition>,
    #[serde(default, deserialize_with = "effect_list")]
    pub effects: Vec<Effect>,
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            description: raw.description,
            active: raw.active.as_ref().is_some_and(truthy),
            causes: raw.causes,
            effects: raw.effects,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCauseData {
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCause {
    #[serde(default, deserialize_with = "lenient")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub data_source: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<RawCauseData>,
    #[serde(default, deserialize_with = "lenient")]
    pub logical_operator: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub active: Option<bool>,
}

impl RawCause {
    /// Legacy `field` wins; otherwise both `dataSource` and `path` are needed.
    pub fn field_path(&self) -> Option<String> {
        if let Some(field) = non_empty(self.field.as_deref()) {
            return Some(field.to_owned());
        }
        let source = non_empty(self.data_source.as_deref())?;
        let path = non_empty(self.path.as_deref())?;
        Some(format!("{source}.{path}"))
    }

    /// `data.value` unless it is null or absent, then the legacy `value`.
    pub fn comparison_value(&self) -> Option<Value> {
        self.data
            .as_ref()
            .and_then(|data| data.value.clone())
            .filter(|value| !value.is_null())
            .or_else(|| self.value.clone())
    }
}

impl From<RawCause> for Condition {
    fn from(raw: RawCause) -> Self {
        Self {
            path: raw.field_path(),
            operator: raw.operator.as_deref().and_then(Operator::parse),
            expected: raw.comparison_value(),
            combinator: LogicalOperator::parse_or_default(raw.logical_operator.as_deref()),
            active: raw.active != Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEffect {
    #[serde(default, deserialize_with = "lenient")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub element: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub section: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub screen: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub active: Option<bool>,
}

impl RawEffect {
    /// `target`, falling back to the legacy `element` name.
    pub fn resolved_target(&self) -> Option<&str> {
        non_empty(self.target.as_deref()).or_else(|| non_empty(self.element.as_deref()))
    }

    fn section(&self) -> Option<&str> {
        non_empty(self.section.as_deref())
    }

    fn data_field(&self, key: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get(key))
            .filter(|value| !value.is_null())
    }

    fn data_value(&self) -> Option<&Value> {
        self.data_field("value")
    }

    fn data_string(&self, key: &str) -> Option<String> {
        self.data_field(key)
            .and_then(Value::as_str)
            .and_then(|value| non_empty(Some(value)))
            .map(str::to_owned)
    }

    fn list_target(&self) -> Option<ListTarget> {
        let target = self.resolved_target().unwrap_or_default();
        let section = self.section();
        if target.starts_with("shortcuts") || target == "shortcut" || section == Some("shortcuts")
        {
            return Some(ListTarget::Shortcuts);
        }
        if target.starts_with("startPlates")
            || target == "startPlate"
            || matches!(section, Some("startPlates" | "startplates"))
        {
            return Some(ListTarget::StartPlates);
        }
        if self.targets_quick_actions() {
            return Some(ListTarget::QuickActions);
        }
        None
    }

    fn targets_quick_actions(&self) -> bool {
        matches!(self.resolved_target(), Some("quickActions" | "quickAction"))
            || self.section() == Some("quickActions")
    }

    /// Under section `header` the target is the field name as written;
    /// otherwise it is the segment after `header.`.
    fn header_field(&self) -> Option<HeaderField> {
        let target = self.resolved_target()?;
        if self.section() == Some("header") {
            return HeaderField::parse(target);
        }
        dotted_header_field(target)
    }

    fn display_target(&self) -> Option<DisplayTarget> {
        let target = self.resolved_target();
        if target.is_some_and(|target| target.starts_with("header."))
            || self.section() == Some("header")
        {
            return self.header_field().map(DisplayTarget::Header);
        }
        match target {
            Some("fab" | "fab.button") => Some(DisplayTarget::Fab),
            Some("allActions") => Some(DisplayTarget::AllActions),
            Some("customizeQuickActions") => Some(DisplayTarget::CustomizeQuickActions),
            _ if self.targets_quick_actions() => Some(DisplayTarget::QuickActions),
            _ => None,
        }
    }

    fn toggle_target(&self) -> Option<DisplayTarget> {
        match self.resolved_target() {
            Some("fab") => Some(DisplayTarget::Fab),
            Some(target) if target.starts_with("header.") => {
                dotted_header_field(target).map(DisplayTarget::Header)
            }
            _ => None,
        }
    }

    fn style_change(&self) -> Option<StyleChange> {
        let target = self.resolved_target();
        if self.targets_quick_actions() {
            let layout = self
                .data_field("layout")
                .or_else(|| self.data_value())
                .and_then(Value::as_str)?;
            return Some(StyleChange::QuickActionsLayout(
                QuickActionsLayout::normalize(layout),
            ));
        }
        if target == Some("partnerLogo") && self.section() == Some("homeImage") {
            let is_url = self.data_field("type").and_then(Value::as_str) == Some("url");
            return self
                .data_string("value")
                .filter(|_| is_url)
                .map(StyleChange::PartnerLogo);
        }
        match target {
            Some("homeImage") => {
                let partner_logo = self.data_string("partnerLogo");
                let url = self.data_string("url");
                if partner_logo.is_none() && url.is_none() {
                    return None;
                }
                Some(StyleChange::HomeImage { partner_logo, url })
            }
            Some("inventory") => self
                .data_field("displayType")
                .and_then(Value::as_str)
                .and_then(InventoryDisplayType::parse)
                .map(StyleChange::InventoryDisplay),
            _ => None,
        }
    }

    fn tab_directives(&self) -> Option<Vec<TabDirective>> {
        if self.section() != Some("tabs") {
            return None;
        }
        let entries = self.data_value()?.as_array()?;
        Some(entries.iter().map(tab_directive).collect())
    }

    fn classify(&self) -> EffectAction {
        let Some(raw_action) = self.action.as_deref() else {
            return EffectAction::Unrecognized(String::new());
        };
        let Some(action) = ActionKind::parse(raw_action) else {
            return EffectAction::Unrecognized(raw_action.to_owned());
        };

        let resolved = match action {
            ActionKind::ShowContent => self.list_target().map(|list| EffectAction::ShowContent {
                list,
                items: self.data_value().map(item_ids).unwrap_or_default(),
            }),
            ActionKind::Filter => self.list_target().map(|list| EffectAction::Filter {
                list,
                directives: self
                    .data_value()
                    .and_then(Value::as_array)
                    .map(|entries| entries.iter().filter_map(filter_directive).collect())
                    .unwrap_or_default(),
            }),
            ActionKind::Display => self.display_target().map(|target| EffectAction::Display {
                target,
                value: self.data_value().cloned().unwrap_or(Value::Null),
            }),
            ActionKind::Style => self.style_change().map(EffectAction::Style),
            ActionKind::Toggle => self.toggle_target().map(|target| EffectAction::Toggle {
                target,
                value: self.data_value().cloned().unwrap_or(Value::Null),
            }),
            ActionKind::ReplaceTabs => self.tab_directives().map(EffectAction::ReplaceTabs),
        };

        resolved.unwrap_or_else(|| EffectAction::Unresolved {
            action,
            target: self.resolved_target().map(str::to_owned),
            section: self.section().map(str::to_owned),
        })
    }
}

impl From<RawEffect> for Effect {
    fn from(raw: RawEffect) -> Self {
        Self {
            action: raw.classify(),
            screen: non_empty(raw.screen.as_deref()).map(str::to_owned),
            active: raw.active != Some(false),
        }
    }
}

fn dotted_header_field(target: &str) -> Option<HeaderField> {
    target.split('.').nth(1).and_then(HeaderField::parse)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Plain id strings or objects carrying an `id`; empty ids are dropped.
fn item_ids(value: &Value) -> Vec<String> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(id) => Some(id.clone()),
            Value::Object(map) => match map.get("id") {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            },
            _ => None,
        })
        .filter(|id| !id.is_empty())
        .collect()
}

fn filter_directive(entry: &Value) -> Option<FilterDirective> {
    let id = entry.get("id")?.as_str().filter(|id| !id.is_empty())?;
    Some(FilterDirective {
        id: id.to_owned(),
        show: entry.get("show").and_then(Value::as_bool),
        order: entry.get("order").and_then(integral),
    })
}

fn tab_directive(entry: &Value) -> TabDirective {
    let assignment = match entry.get("id") {
        Some(Value::Null) => TabAssignment::Hide,
        Some(Value::String(id)) if !id.is_empty() => TabAssignment::Replace(id.clone()),
        _ => TabAssignment::Invalid,
    };
    TabDirective {
        position: entry.get("position").and_then(integral),
        assignment,
    }
}

/// Integers, or floats truncated toward zero.
fn integral(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|raw| raw.is_finite()).map(|raw| raw.trunc() as i64))
}

#[cfg(test)]
mod tests {
    use crate::{
        ActionKind, Condition, DisplayTarget, Effect, EffectAction, FilterDirective, HeaderField,
        InventoryDisplayType, ListTarget, LogicalOperator, Operator, QuickActionsLayout, Rule,
        StyleChange, TabAssignment, TabDirective, parse_entries,
    };
    use anyhow::Result;
    use serde_json::{Value, json};

    fn cause(value: Value) -> Result<Condition> {
        Ok(serde_json::from_value(value)?)
    }

    fn effect(value: Value) -> Result<Effect> {
        Ok(serde_json::from_value(value)?)
    }

    #[test]
    fn legacy_field_path_is_preferred() -> Result<()> {
        let parsed = cause(json!({
            "field": "home.type",
            "dataSource": "user",
            "path": "countryISO",
            "operator": "eq",
            "value": "house",
        }))?;
        assert_eq!(parsed.path.as_deref(), Some("home.type"));
        assert_eq!(parsed.operator, Some(Operator::Eq));
        assert_eq!(parsed.expected, Some(json!("house")));
        assert!(parsed.active);
        Ok(())
    }

    #[test]
    fn data_source_and_path_are_joined() -> Result<()> {
        let parsed = cause(json!({
            "dataSource": "user",
            "path": "partner.name",
            "operator": "ne",
            "data": { "type": "string", "value": "Acme" },
            "logicalOperator": "OR",
        }))?;
        assert_eq!(parsed.path.as_deref(), Some("user.partner.name"));
        assert_eq!(parsed.expected, Some(json!("Acme")));
        assert_eq!(parsed.combinator, LogicalOperator::Or);
        Ok(())
    }

    #[test]
    fn cause_without_any_path_form_has_no_path() -> Result<()> {
        assert_eq!(cause(json!({ "path": "type", "operator": "eq" }))?.path, None);
        assert_eq!(cause(json!({ "field": "", "operator": "eq" }))?.path, None);
        Ok(())
    }

    #[test]
    fn null_data_value_falls_back_to_legacy_value() -> Result<()> {
        let parsed = cause(json!({
            "field": "user.partner",
            "operator": "ne",
            "data": { "type": "null", "value": null },
            "value": null,
        }))?;
        assert_eq!(parsed.expected, Some(Value::Null));

        let absent = cause(json!({ "field": "user.partner", "operator": "ne" }))?;
        assert_eq!(absent.expected, None);
        Ok(())
    }

    #[test]
    fn unknown_operator_is_kept_as_missing() -> Result<()> {
        let parsed = cause(json!({ "field": "home.type", "operator": "like", "active": false }))?;
        assert_eq!(parsed.operator, None);
        assert!(!parsed.active);
        Ok(())
    }

    #[test]
    fn show_content_extracts_ids_and_drops_blanks() -> Result<()> {
        let parsed = effect(json!({
            "action": "showContent",
            "element": "shortcuts.main",
            "data": { "value": ["a", { "id": "b" }, { "title": "no id" }, "", null] },
        }))?;
        assert_eq!(
            parsed.action,
            EffectAction::ShowContent {
                list: ListTarget::Shortcuts,
                items: vec!["a".to_owned(), "b".to_owned()],
            }
        );
        assert_eq!(parsed.screen(), "start");
        Ok(())
    }

    #[test]
    fn section_classifies_list_targets() -> Result<()> {
        let plates = effect(json!({
            "action": "filter",
            "section": "startplates",
            "data": { "value": [{ "id": "p1", "show": true, "order": 0 }, { "show": false }] },
        }))?;
        assert_eq!(
            plates.action,
            EffectAction::Filter {
                list: ListTarget::StartPlates,
                directives: vec![FilterDirective {
                    id: "p1".to_owned(),
                    show: Some(true),
                    order: Some(0),
                }],
            }
        );
        Ok(())
    }

    #[test]
    fn display_checks_specific_targets_before_quick_actions() -> Result<()> {
        let all_actions = effect(json!({
            "action": "display",
            "target": "allActions",
            "section": "quickActions",
            "data": { "value": true },
        }))?;
        assert_eq!(
            all_actions.action,
            EffectAction::Display {
                target: DisplayTarget::AllActions,
                value: json!(true),
            }
        );

        let header = effect(json!({
            "action": "display",
            "section": "header",
            "target": "homeInfo",
            "data": { "value": true },
        }))?;
        assert_eq!(
            header.action,
            EffectAction::Display {
                target: DisplayTarget::Header(HeaderField::HomeInfo),
                value: json!(true),
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_header_field_is_unresolved() -> Result<()> {
        let parsed = effect(json!({
            "action": "display",
            "target": "header.weather",
            "data": { "value": true },
        }))?;
        assert_eq!(
            parsed.action,
            EffectAction::Unresolved {
                action: ActionKind::Display,
                target: Some("header.weather".to_owned()),
                section: None,
            }
        );
        Ok(())
    }

    #[test]
    fn toggle_only_covers_fab_and_header() -> Result<()> {
        let fab = effect(json!({ "action": "toggle", "target": "fab", "data": { "value": false } }))?;
        assert_eq!(
            fab.action,
            EffectAction::Toggle {
                target: DisplayTarget::Fab,
                value: json!(false),
            }
        );
        let quick = effect(json!({ "action": "toggle", "target": "quickActions" }))?;
        assert!(matches!(quick.action, EffectAction::Unresolved { .. }));
        Ok(())
    }

    #[test]
    fn style_payloads_are_validated() -> Result<()> {
        let layout = effect(json!({
            "action": "style",
            "target": "quickActions",
            "data": { "value": "list" },
        }))?;
        assert_eq!(
            layout.action,
            EffectAction::Style(StyleChange::QuickActionsLayout(QuickActionsLayout::List))
        );

        let logo = effect(json!({
            "action": "style",
            "section": "homeImage",
            "target": "partnerLogo",
            "data": { "type": "url", "value": "https://cdn.example/logo.png" },
        }))?;
        assert_eq!(
            logo.action,
            EffectAction::Style(StyleChange::PartnerLogo(
                "https://cdn.example/logo.png".to_owned()
            ))
        );

        let inventory = effect(json!({
            "action": "style",
            "target": "inventory",
            "data": { "displayType": "microcards" },
        }))?;
        assert_eq!(
            inventory.action,
            EffectAction::Style(StyleChange::InventoryDisplay(
                InventoryDisplayType::Microcards
            ))
        );

        let not_url = effect(json!({
            "action": "style",
            "section": "homeImage",
            "target": "partnerLogo",
            "data": { "type": "asset", "value": "logo" },
        }))?;
        assert!(matches!(not_url.action, EffectAction::Unresolved { .. }));
        Ok(())
    }

    #[test]
    fn replace_tabs_keeps_null_and_missing_ids_apart() -> Result<()> {
        let parsed = effect(json!({
            "action": "replaceTabs",
            "section": "tabs",
            "screen": "global",
            "data": { "value": [
                { "position": 2, "id": null },
                { "position": 3, "id": "madeliaFireSafetyTab" },
                { "position": "4" },
            ] },
        }))?;
        assert_eq!(parsed.screen(), "global");
        assert_eq!(
            parsed.action,
            EffectAction::ReplaceTabs(vec![
                TabDirective {
                    position: Some(2),
                    assignment: TabAssignment::Hide,
                },
                TabDirective {
                    position: Some(3),
                    assignment: TabAssignment::Replace("madeliaFireSafetyTab".to_owned()),
                },
                TabDirective {
                    position: None,
                    assignment: TabAssignment::Invalid,
                },
            ])
        );
        Ok(())
    }

    #[test]
    fn unknown_action_is_preserved() -> Result<()> {
        let parsed = effect(json!({ "action": "wiggle", "target": "fab", "active": false }))?;
        assert_eq!(parsed.action, EffectAction::Unrecognized("wiggle".to_owned()));
        assert!(!parsed.active);
        Ok(())
    }

    #[test]
    fn rule_defaults_to_inactive_when_flag_missing() -> Result<()> {
        let rule: Rule = serde_json::from_value(json!({
            "name": "partner users",
            "causes": [{ "field": "user.partner", "operator": "ne", "value": null }],
            "effects": [{ "action": "display", "target": "fab", "data": { "value": false } }],
        }))?;
        assert!(!rule.active);
        assert_eq!(rule.causes.len(), 1);
        assert_eq!(rule.effects.len(), 1);
        Ok(())
    }

    #[test]
    fn null_rule_fields_read_as_absent() -> Result<()> {
        let rule: Rule = serde_json::from_value(json!({
            "name": null,
            "active": true,
            "causes": null,
            "effects": null,
        }))?;
        assert!(rule.active);
        assert!(rule.name.is_empty());
        assert!(rule.causes.is_empty());
        assert!(rule.effects.is_empty());

        let inactive: Rule = serde_json::from_value(json!({ "name": "r", "active": null }))?;
        assert!(!inactive.active);
        Ok(())
    }

    #[test]
    fn rule_active_follows_json_truthiness() -> Result<()> {
        for (flag, expected) in [
            (json!(true), true),
            (json!(1), true),
            (json!("yes"), true),
            (json!(false), false),
            (json!(0), false),
            (json!(""), false),
        ] {
            let rule: Rule = serde_json::from_value(json!({ "name": "r", "active": flag.clone() }))?;
            assert_eq!(rule.active, expected, "active = {flag}");
        }
        Ok(())
    }

    #[test]
    fn mistyped_cause_fields_read_as_absent() -> Result<()> {
        let parsed = cause(json!({
            "field": "home.type",
            "operator": "eq",
            "value": "house",
            "active": "yes",
            "logicalOperator": 7,
            "data": "house",
        }))?;
        assert!(parsed.active);
        assert_eq!(parsed.combinator, LogicalOperator::And);
        assert_eq!(parsed.expected, Some(json!("house")));

        let no_path = cause(json!({ "field": ["home", "type"], "operator": "eq" }))?;
        assert_eq!(no_path.path, None);
        Ok(())
    }

    #[test]
    fn non_object_cause_stays_in_chain_without_operator() -> Result<()> {
        let rule: Rule = serde_json::from_value(json!({
            "name": "r",
            "active": true,
            "causes": [{ "field": "home.type", "operator": "eq", "value": "house" }, "oops"],
        }))?;
        assert_eq!(rule.causes.len(), 2);
        assert_eq!(rule.causes[1].operator, None);
        assert_eq!(rule.causes[1].path, None);
        Ok(())
    }

    #[test]
    fn malformed_effects_are_skipped_individually() -> Result<()> {
        let rule: Rule = serde_json::from_value(json!({
            "name": "r",
            "active": true,
            "effects": [
                { "action": "display", "target": "fab", "data": { "value": false } },
                42,
                { "action": "toggle", "target": "fab", "active": "no" },
            ],
        }))?;
        assert_eq!(rule.effects.len(), 2);
        assert!(rule.effects[1].active);
        Ok(())
    }

    #[test]
    fn bad_rules_do_not_sink_the_rest() {
        let rules: Vec<Rule> = parse_entries(
            vec![
                json!({ "name": "good", "active": true, "causes": [], "effects": [] }),
                json!("not a rule"),
                json!({ "name": "nullcauses", "active": true, "causes": null, "effects": [] }),
            ],
            "rule",
        );
        let names: Vec<&str> = rules.iter().map(|rule| rule.name.as_str()).collect();
        assert_eq!(names, ["good", "nullcauses"]);
    }

    #[test]
    fn replace_tabs_requires_tabs_section() -> Result<()> {
        let parsed = effect(json!({
            "action": "replaceTabs",
            "data": { "value": [{ "position": 2, "id": null }] },
        }))?;
        assert_eq!(
            parsed.action,
            EffectAction::Unresolved {
                action: ActionKind::ReplaceTabs,
                target: None,
                section: None,
            }
        );
        Ok(())
    }

    #[test]
    fn header_section_uses_target_as_written() -> Result<()> {
        let dotted = effect(json!({
            "action": "display",
            "section": "header",
            "target": "header.avatars",
            "data": { "value": true },
        }))?;
        assert!(matches!(dotted.action, EffectAction::Unresolved { .. }));

        let plain = effect(json!({
            "action": "display",
            "target": "header.avatars",
            "data": { "value": true },
        }))?;
        assert_eq!(
            plain.action,
            EffectAction::Display {
                target: DisplayTarget::Header(HeaderField::Avatars),
                value: json!(true),
            }
        );
        Ok(())
    }
}

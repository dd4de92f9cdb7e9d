// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use flexrule_app::{
    AppliedEffectsState, BuiltinTabLabels, Context, DEFAULT_ASSET_BASE_URL, EXPENSES_SCREEN,
    FALLBACK_LANGUAGE, Rule, TabLabels,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::apply::EffectApplier;
use crate::matcher::{InactiveCauseMode, conditions_match};
use crate::sources::{DefaultEffectsSource, TabResolver};

/// Per-render inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest<'a> {
    pub screen: &'a str,
    pub include_defaults: bool,
    pub defaults_version: Option<&'a str>,
    pub language: &'a str,
}

impl<'a> RenderRequest<'a> {
    pub fn new(screen: &'a str) -> Self {
        Self {
            screen,
            include_defaults: true,
            defaults_version: None,
            language: FALLBACK_LANGUAGE,
        }
    }

    pub fn include_defaults(mut self, include: bool) -> Self {
        self.include_defaults = include;
        self
    }

    pub fn defaults_version(mut self, version: Option<&'a str>) -> Self {
        self.defaults_version = version;
        self
    }

    pub fn language(mut self, language: &'a str) -> Self {
        self.language = language;
        self
    }
}

/// A render's final state plus a trace of what produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub state: AppliedEffectsState,
    pub defaults_applied: usize,
    /// Names of matching rules, in application order.
    pub matched_rules: Vec<String>,
    pub subtab_rule: Option<String>,
}

pub struct RuleEngine<'a> {
    defaults: &'a dyn DefaultEffectsSource,
    tabs: Option<&'a dyn TabResolver>,
    labels: &'a dyn TabLabels,
    inactive_causes: InactiveCauseMode,
    asset_base_url: String,
}

impl<'a> RuleEngine<'a> {
    pub fn new(defaults: &'a dyn DefaultEffectsSource) -> Self {
        Self {
            defaults,
            tabs: None,
            labels: &BuiltinTabLabels,
            inactive_causes: InactiveCauseMode::default(),
            asset_base_url: DEFAULT_ASSET_BASE_URL.to_owned(),
        }
    }

    pub fn with_tabs(mut self, tabs: &'a dyn TabResolver) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn with_labels(mut self, labels: &'a dyn TabLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_inactive_causes(mut self, mode: InactiveCauseMode) -> Self {
        self.inactive_causes = mode;
        self
    }

    pub fn with_asset_base_url(mut self, url: &str) -> Self {
        self.asset_base_url = url.to_owned();
        self
    }

    pub fn matches(&self, rule: &Rule, context: &Context) -> bool {
        conditions_match(&rule.causes, context, self.inactive_causes)
    }

    pub fn apply_rules(
        &self,
        rules: &[Rule],
        context: &Context,
        request: &RenderRequest<'_>,
    ) -> AppliedEffectsState {
        self.render(rules, context, request).state
    }

    /// Defaults first, then active rules from last to first, then the
    /// expenses subtab rule on top.
    pub fn render(
        &self,
        rules: &[Rule],
        context: &Context,
        request: &RenderRequest<'_>,
    ) -> RenderReport {
        let applier = EffectApplier::new(self.tabs, request.language);
        let mut state =
            AppliedEffectsState::initial(self.labels, request.language, &self.asset_base_url);

        let mut defaults_applied = 0;
        if request.include_defaults {
            let defaults = match self.defaults.default_effects(request.defaults_version) {
                Ok(effects) => effects,
                Err(error) => {
                    warn!(
                        version = ?request.defaults_version,
                        error = %format!("{error:#}"),
                        "default effects unavailable, continuing without them"
                    );
                    Vec::new()
                }
            };
            for effect in &defaults {
                if applier.apply(&mut state, effect, request.screen).is_applied() {
                    defaults_applied += 1;
                }
            }
        }

        let mut matched_rules = Vec::new();
        for rule in rules.iter().rev().filter(|rule| rule.active) {
            if !self.matches(rule, context) {
                continue;
            }
            debug!(rule = %rule.name, effects = rule.effects.len(), "rule matched");
            for effect in &rule.effects {
                applier.apply(&mut state, effect, request.screen);
            }
            matched_rules.push(rule.name.clone());
        }

        let subtab_rule = self.apply_subtab_rule(&applier, &mut state, rules, context, request);

        info!(
            screen = request.screen,
            defaults = defaults_applied,
            matched = matched_rules.len(),
            subtab = ?subtab_rule,
            "rendered screen"
        );

        RenderReport {
            state,
            defaults_applied,
            matched_rules,
            subtab_rule,
        }
    }

    fn apply_subtab_rule(
        &self,
        applier: &EffectApplier<'_>,
        state: &mut AppliedEffectsState,
        rules: &[Rule],
        context: &Context,
        request: &RenderRequest<'_>,
    ) -> Option<String> {
        if request.screen != EXPENSES_SCREEN {
            return None;
        }
        let subtab = context.active_subtab()?;
        let rule = rules
            .iter()
            .find(|rule| rule.active && rule.name == subtab && self.matches(rule, context))?;

        debug!(rule = %rule.name, subtab, "applying subtab rule");
        for effect in &rule.effects {
            applier.apply(state, effect, subtab);
        }
        Some(rule.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderRequest, RuleEngine};
    use crate::matcher::InactiveCauseMode;
    use crate::sources::{DefaultEffectsSource, NoDefaultEffects, StaticDefaultEffects};
    use anyhow::{Result, bail};
    use flexrule_app::{
        Condition, Context, DisplayTarget, Effect, EffectAction, ListTarget, Operator, Rule,
        TabLabels,
    };
    use serde_json::json;

    struct Unreachable;

    impl DefaultEffectsSource for Unreachable {
        fn default_effects(&self, _version: Option<&str>) -> Result<Vec<Effect>> {
            bail!("connection refused")
        }
    }

    struct Shouting;

    impl TabLabels for Shouting {
        fn tab_label(&self, tab_id: &str, _language: &str) -> String {
            tab_id.to_uppercase()
        }
    }

    fn shortcuts(items: &[&str]) -> Effect {
        Effect::new(EffectAction::ShowContent {
            list: ListTarget::Shortcuts,
            items: items.iter().map(|item| (*item).to_owned()).collect(),
        })
    }

    fn fab(visible: bool) -> Effect {
        Effect::new(EffectAction::Display {
            target: DisplayTarget::Fab,
            value: json!(visible),
        })
    }

    #[test]
    fn first_listed_rule_wins_conflicts() {
        let rules = [
            Rule::new("RuleOld").with_effect(shortcuts(&["x"])),
            Rule::new("RuleNew").with_effect(shortcuts(&["y"])),
        ];
        let engine = RuleEngine::new(&NoDefaultEffects);
        let report = engine.render(&rules, &Context::new(), &RenderRequest::new("start"));
        assert_eq!(report.state.shortcuts, ["x"]);
        assert_eq!(report.matched_rules, ["RuleNew", "RuleOld"]);
    }

    #[test]
    fn inactive_and_unmatched_rules_are_skipped() -> Result<()> {
        let context = Context::from_value(json!({ "home": { "type": "flat" } }))?;
        let rules = [
            Rule::new("off").deactivated().with_effect(fab(false)),
            Rule::new("houses")
                .with_cause(Condition::new("home.type", Operator::Eq, json!("house")))
                .with_effect(fab(false)),
        ];
        let engine = RuleEngine::new(&NoDefaultEffects);
        let report = engine.render(&rules, &context, &RenderRequest::new("start"));
        assert!(report.state.fab.visible);
        assert!(report.matched_rules.is_empty());
        Ok(())
    }

    #[test]
    fn defaults_apply_before_rules_and_can_be_skipped() {
        let defaults = StaticDefaultEffects::new(vec![shortcuts(&["default"]), fab(false)]);
        let rules = [Rule::new("custom").with_effect(shortcuts(&["custom"]))];
        let engine = RuleEngine::new(&defaults);

        let report = engine.render(&rules, &Context::new(), &RenderRequest::new("start"));
        assert_eq!(report.defaults_applied, 2);
        assert_eq!(report.state.shortcuts, ["custom"]);
        assert!(!report.state.fab.visible);

        let request = RenderRequest::new("start").include_defaults(false);
        let state = engine.apply_rules(&rules, &Context::new(), &request);
        assert!(state.fab.visible);
    }

    #[test]
    fn failing_defaults_source_is_fail_soft() {
        let rules = [Rule::new("custom").with_effect(shortcuts(&["custom"]))];
        let engine = RuleEngine::new(&Unreachable);
        let report = engine.render(&rules, &Context::new(), &RenderRequest::new("start"));
        assert_eq!(report.defaults_applied, 0);
        assert_eq!(report.state.shortcuts, ["custom"]);
    }

    #[test]
    fn labels_and_asset_base_seed_bottom_tabs() {
        let engine = RuleEngine::new(&NoDefaultEffects)
            .with_labels(&Shouting)
            .with_asset_base_url("https://cdn.test/");
        let state = engine.apply_rules(&[], &Context::new(), &RenderRequest::new("start"));
        assert_eq!(state.bottom_tabs[1].label, "INVENTORY");
        assert_eq!(
            state.bottom_tabs[1].icon,
            "https://cdn.test/icons_app/inventory_nav.png"
        );
    }

    #[test]
    fn subtab_pass_only_runs_on_expenses() -> Result<()> {
        let context = Context::from_value(json!({
            "expensesScreen": { "activeSubtab": "expenses-trackers" },
        }))?;
        let rules = [Rule::new("expenses-trackers").with_effect(
            Effect::new(EffectAction::Display {
                target: DisplayTarget::QuickActions,
                value: json!(true),
            })
            .on_screen("expenses-trackers"),
        )];
        let engine = RuleEngine::new(&NoDefaultEffects);

        let report = engine.render(&rules, &context, &RenderRequest::new("expenses"));
        assert_eq!(report.subtab_rule.as_deref(), Some("expenses-trackers"));
        assert!(report.state.quick_actions.expenses.visible);

        let report = engine.render(&rules, &context, &RenderRequest::new("start"));
        assert_eq!(report.subtab_rule, None);
        assert!(!report.state.quick_actions.expenses.visible);
        Ok(())
    }

    #[test]
    fn engine_inactive_mode_controls_matching() {
        let rule = Rule::new("gated")
            .with_cause(Condition::new("home.type", Operator::Eq, json!("house")).inactive())
            .with_effect(fab(false));
        let rules = [rule];

        let strict = RuleEngine::new(&NoDefaultEffects);
        let state = strict.apply_rules(&rules, &Context::new(), &RenderRequest::new("start"));
        assert!(state.fab.visible);

        let lenient =
            RuleEngine::new(&NoDefaultEffects).with_inactive_causes(InactiveCauseMode::Exclude);
        let state = lenient.apply_rules(&rules, &Context::new(), &RenderRequest::new("start"));
        assert!(!state.fab.visible);
    }
}

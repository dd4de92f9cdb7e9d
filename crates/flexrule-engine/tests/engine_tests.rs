// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use flexrule_app::{AppliedEffectsState, Context, QuickActionsLayout};
use flexrule_engine::{
    EffectApplier, InactiveCauseMode, NoDefaultEffects, RenderRequest, RuleEngine,
    StaticDefaultEffects, evaluate, matches,
};
use flexrule_testkit::{
    ContextFaker, FailingDefaults, StaticTabResolver, effects_from_json, expenses_context,
    house_context, rules_from_json, sample_default_effects, shortcuts_rule,
};
use serde_json::json;

#[test]
fn house_rule_hides_fab_on_start() -> Result<()> {
    let rules = rules_from_json(json!([{
        "name": "Hide fab for houses",
        "active": true,
        "causes": [{ "field": "home.type", "operator": "eq", "value": "house" }],
        "effects": [{ "action": "display", "target": "fab", "data": { "value": false } }],
    }]))?;

    let engine = RuleEngine::new(&NoDefaultEffects);
    let state = engine.apply_rules(&rules, &house_context(), &RenderRequest::new("start"));
    assert!(!state.fab.visible);

    let state = engine.apply_rules(&rules, &house_context(), &RenderRequest::new("inventory"));
    assert!(state.fab.visible);
    Ok(())
}

#[test]
fn earlier_rule_overwrites_later_rule() -> Result<()> {
    let rules = [
        shortcuts_rule("RuleOld", &["documents", "scan"])?,
        shortcuts_rule("RuleNew", &["expenses"])?,
    ];
    let engine = RuleEngine::new(&NoDefaultEffects);
    let report = engine.render(&rules, &house_context(), &RenderRequest::new("start"));
    assert_eq!(report.state.shortcuts, ["documents", "scan"]);
    assert_eq!(report.matched_rules, ["RuleNew", "RuleOld"]);
    Ok(())
}

#[test]
fn rules_apply_last_to_first() -> Result<()> {
    let rules = rules_from_json(json!([
        { "name": "R1", "active": true, "effects": [
            { "action": "filter", "target": "shortcuts", "data": { "value": [{ "id": "r1", "show": true }] } },
        ] },
        { "name": "R2", "active": true, "effects": [
            { "action": "filter", "target": "shortcuts", "data": { "value": [{ "id": "r2", "show": true }] } },
        ] },
        { "name": "R3", "active": true, "effects": [
            { "action": "filter", "target": "shortcuts", "data": { "value": [{ "id": "r3", "show": true }] } },
        ] },
    ]))?;
    let engine = RuleEngine::new(&NoDefaultEffects);
    let state = engine.apply_rules(&rules, &Context::new(), &RenderRequest::new("start"));
    assert_eq!(state.shortcuts, ["r3", "r2", "r1"]);
    Ok(())
}

#[test]
fn filter_semantics_on_shortcuts() -> Result<()> {
    let applier = EffectApplier::new(None, "en");
    let mut state = AppliedEffectsState::default();
    let effects = effects_from_json(json!([
        { "action": "showContent", "target": "shortcuts", "data": { "value": ["a", "b"] } },
        { "action": "filter", "target": "shortcuts", "data": { "value": [{ "id": "x", "show": false }] } },
        { "action": "filter", "target": "shortcuts", "data": { "value": [{ "id": "y", "show": true, "order": 0 }] } },
        { "action": "filter", "target": "shortcuts", "data": { "value": [{ "id": "a", "show": false }] } },
    ]))?;

    applier.apply(&mut state, &effects[0], "start");
    assert_eq!(state.shortcuts, ["a", "b"]);
    applier.apply(&mut state, &effects[1], "start");
    assert_eq!(state.shortcuts, ["a", "b"]);
    applier.apply(&mut state, &effects[2], "start");
    assert_eq!(state.shortcuts, ["y", "a", "b"]);
    applier.apply(&mut state, &effects[3], "start");
    assert_eq!(state.shortcuts, ["y", "b"]);
    Ok(())
}

#[test]
fn replace_tabs_never_touches_start_tab() -> Result<()> {
    let rules = rules_from_json(json!([{
        "name": "Fire safety tab",
        "active": true,
        "effects": [{
            "action": "replaceTabs",
            "section": "tabs",
            "screen": "global",
            "data": { "value": [
                { "position": 0, "id": "fireSafety" },
                { "position": 0, "id": null },
                { "position": 4, "id": "fireSafety" },
            ] },
        }],
    }]))?;
    let tabs = StaticTabResolver::fire_safety()?;
    let engine = RuleEngine::new(&NoDefaultEffects).with_tabs(&tabs);

    let request = RenderRequest::new("inventory").language("es");
    let state = engine.apply_rules(&rules, &house_context(), &request);

    let start = &state.bottom_tabs[0];
    assert_eq!(start.id, "start");
    assert!(start.visible);
    assert_eq!(start.label, "Inicio");

    let replaced = &state.bottom_tabs[4];
    assert_eq!(replaced.id, "fireSafety");
    assert_eq!(replaced.label, "Seguridad");
    assert!(replaced.icon.ends_with("/icons_app/fireSafety_nav.png"));
    Ok(())
}

#[test]
fn expenses_subtab_rule_switches_layout() -> Result<()> {
    let rules = rules_from_json(json!([
        {
            "name": "expenses-trackers",
            "active": true,
            "causes": [],
            "effects": [{
                "action": "style",
                "target": "quickActions",
                "screen": "expenses-trackers",
                "data": { "layout": "list" },
            }],
        },
        {
            "name": "expenses-all",
            "active": true,
            "causes": [{ "field": "home.type", "operator": "eq", "value": "villa" }],
            "effects": [{
                "action": "style",
                "target": "quickActions",
                "screen": "expenses-all",
                "data": { "value": "grid" },
            }],
        },
    ]))?;
    let engine = RuleEngine::new(&NoDefaultEffects);

    let report = engine.render(
        &rules,
        &expenses_context("expenses-trackers"),
        &RenderRequest::new("expenses"),
    );
    assert_eq!(report.subtab_rule.as_deref(), Some("expenses-trackers"));
    assert_eq!(
        report.state.quick_actions.expenses.layout,
        QuickActionsLayout::List
    );

    let report = engine.render(
        &rules,
        &expenses_context("expenses-all"),
        &RenderRequest::new("expenses"),
    );
    assert_eq!(report.subtab_rule, None);
    Ok(())
}

#[test]
fn rule_with_null_causes_always_matches() -> Result<()> {
    let rules = rules_from_json(json!([
        {
            "name": "Hide fab",
            "active": true,
            "causes": null,
            "effects": [{ "action": "display", "target": "fab", "data": { "value": false } }],
        },
        { "name": "No effects", "active": true, "causes": [], "effects": null },
    ]))?;
    let engine = RuleEngine::new(&NoDefaultEffects);
    let report = engine.render(&rules, &Context::new(), &RenderRequest::new("start"));
    assert!(!report.state.fab.visible);
    assert_eq!(report.matched_rules, ["No effects", "Hide fab"]);
    Ok(())
}

#[test]
fn defaults_failure_still_applies_rules() -> Result<()> {
    let rules = [shortcuts_rule("custom", &["inbox"])?];
    let engine = RuleEngine::new(&FailingDefaults);
    let report = engine.render(&rules, &house_context(), &RenderRequest::new("start"));
    assert_eq!(report.defaults_applied, 0);
    assert_eq!(report.state.shortcuts, ["inbox"]);
    Ok(())
}

#[test]
fn defaults_are_screen_scoped_and_overridable() -> Result<()> {
    let defaults = StaticDefaultEffects::new(effects_from_json(sample_default_effects())?);
    let rules = [shortcuts_rule("custom", &["inbox"])?];
    let engine = RuleEngine::new(&defaults);

    let report = engine.render(&rules, &house_context(), &RenderRequest::new("start"));
    assert_eq!(report.defaults_applied, 2);
    assert!(report.state.header.avatars);
    assert_eq!(report.state.shortcuts, ["inbox"]);
    assert!(!report.state.quick_actions.inventory.visible);

    let report = engine.render(&[], &house_context(), &RenderRequest::new("inventory"));
    assert_eq!(report.defaults_applied, 1);
    assert!(report.state.quick_actions.inventory.visible);
    Ok(())
}

#[test]
fn exclude_mode_ignores_inactive_causes() -> Result<()> {
    let rules = rules_from_json(json!([{
        "name": "gated",
        "active": true,
        "causes": [
            { "field": "home.type", "operator": "eq", "value": "flat", "active": false },
            { "field": "home.type", "operator": "eq", "value": "house", "logicalOperator": "OR" },
        ],
        "effects": [{ "action": "display", "target": "header.search", "data": { "value": true } }],
    }]))?;

    let strict = RuleEngine::new(&NoDefaultEffects);
    let state = strict.apply_rules(&rules, &house_context(), &RenderRequest::new("start"));
    assert_eq!(state.header.search, Some(true));

    let lenient =
        RuleEngine::new(&NoDefaultEffects).with_inactive_causes(InactiveCauseMode::Exclude);
    let state = lenient.apply_rules(&rules, &house_context(), &RenderRequest::new("start"));
    assert_eq!(state.header.search, Some(true));
    Ok(())
}

#[test]
fn inactive_causes_never_hold_for_generated_contexts() -> Result<()> {
    let causes = rules_from_json(json!([{
        "name": "probe",
        "active": true,
        "causes": [
            { "field": "home.type", "operator": "nin", "value": ["igloo"], "active": false },
            { "dataSource": "userActivity", "path": "homesCount", "operator": "gte", "data": { "value": 1 }, "active": false },
            { "field": "user.partner", "operator": "ne", "value": null, "active": false },
        ],
    }]))?;
    let rule = &causes[0];

    let mut faker = ContextFaker::new(11);
    for _ in 0..50 {
        let context = faker.context();
        assert!(rule.causes.iter().all(|cause| !evaluate(cause, &context)));
        assert!(!matches(rule, &context));
    }
    Ok(())
}

#[test]
fn empty_rule_matches_any_generated_context() -> Result<()> {
    let rules = rules_from_json(json!([{ "name": "always", "active": true }]))?;
    let mut faker = ContextFaker::new(3);
    for _ in 0..50 {
        assert!(matches(&rules[0], &faker.context()));
    }
    Ok(())
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use flexrule_app::{
    AppliedEffectsState, BottomTab, DisplayTarget, EXPENSES_SCREEN, Effect, EffectAction,
    FilterDirective, GLOBAL_SCREEN, ListTarget, StyleChange, TabAssignment, TabDirective,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::sources::TabResolver;

/// Locale consulted when the render language has no tab label.
const TAB_LABEL_FALLBACK_LOCALE: &str = "en-GB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Inactive,
    OutOfScope,
    Ignored(String),
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Whether an effect scoped to `effect_screen` applies while rendering
/// `current_screen`.
pub fn screen_matches(effect_screen: &str, current_screen: &str) -> bool {
    effect_screen == current_screen
        || effect_screen == GLOBAL_SCREEN
        || (current_screen == EXPENSES_SCREEN && effect_screen.starts_with(EXPENSES_SCREEN))
}

/// Applies visibility and ordering directives to an ordered id list.
pub fn apply_filter(items: &mut Vec<String>, directives: &[FilterDirective]) {
    for directive in directives {
        let present = items.contains(&directive.id);
        match directive.show {
            Some(false) => {
                items.retain(|item| item != &directive.id);
                continue;
            }
            Some(true) if !present => items.push(directive.id.clone()),
            _ => {}
        }

        let Some(order) = directive.order else {
            continue;
        };
        if !items.contains(&directive.id) {
            continue;
        }
        items.retain(|item| item != &directive.id);
        let len = items.len();
        let index = if order < 0 {
            len.saturating_sub(usize::try_from(order.unsigned_abs()).unwrap_or(usize::MAX))
        } else {
            usize::try_from(order).map_or(len, |order| order.min(len))
        };
        items.insert(index, directive.id.clone());
    }
}

/// Applies single effects to a render state.
#[derive(Clone, Copy)]
pub struct EffectApplier<'a> {
    tabs: Option<&'a dyn TabResolver>,
    language: &'a str,
}

impl<'a> EffectApplier<'a> {
    pub fn new(tabs: Option<&'a dyn TabResolver>, language: &'a str) -> Self {
        Self { tabs, language }
    }

    pub fn apply(
        &self,
        state: &mut AppliedEffectsState,
        effect: &Effect,
        current_screen: &str,
    ) -> ApplyOutcome {
        if !effect.active {
            return ApplyOutcome::Inactive;
        }
        if !screen_matches(effect.screen(), current_screen) {
            return ApplyOutcome::OutOfScope;
        }

        let outcome = match &effect.action {
            EffectAction::ShowContent { list, items } => {
                show_content(state, *list, items, current_screen)
            }
            EffectAction::Filter { list, directives } => {
                match state.list_mut(*list, current_screen) {
                    Some(current) => {
                        apply_filter(current, directives);
                        ApplyOutcome::Applied
                    }
                    None => no_bucket(current_screen),
                }
            }
            EffectAction::Display { target, value } | EffectAction::Toggle { target, value } => {
                display(state, *target, value, current_screen)
            }
            EffectAction::Style(change) => style(state, change, current_screen),
            EffectAction::ReplaceTabs(directives) => {
                self.replace_tabs(state, directives);
                ApplyOutcome::Applied
            }
            EffectAction::Unresolved {
                action,
                target,
                section,
            } => {
                warn!(
                    action = action.as_str(),
                    target = ?target,
                    section = ?section,
                    "effect target did not resolve"
                );
                ApplyOutcome::Ignored(format!("unresolved {} target", action.as_str()))
            }
            EffectAction::Unrecognized(action) => {
                warn!(action = %action, "unknown effect action");
                ApplyOutcome::Ignored(format!("unknown action {action:?}"))
            }
        };

        if outcome.is_applied() {
            debug!(
                action = effect.action.name(),
                screen = current_screen,
                "applied effect"
            );
        }
        outcome
    }

    fn replace_tabs(&self, state: &mut AppliedEffectsState, directives: &[TabDirective]) {
        let mut tabs = state.bottom_tabs.clone();

        for directive in directives {
            let Some(position) = directive.position else {
                warn!("tab directive has no integer position, skipping");
                continue;
            };
            if position == 0 {
                warn!(assignment = ?directive.assignment, "start tab cannot be replaced, skipping");
                continue;
            }
            let index = usize::try_from(position)
                .ok()
                .filter(|index| *index < tabs.len());

            match &directive.assignment {
                TabAssignment::Hide => match index {
                    Some(index) => {
                        tabs[index].visible = false;
                        debug!(position, tab = %tabs[index].id, "hid bottom tab");
                    }
                    None => warn!(position, tabs = tabs.len(), "tab position out of range"),
                },
                TabAssignment::Replace(tab_id) => {
                    let Some(tab) = self.resolve_tab(tab_id, position) else {
                        warn!(tab = %tab_id, position, "could not resolve tab metadata, skipping");
                        continue;
                    };
                    match index {
                        Some(index) => {
                            debug!(position, old = %tabs[index].id, new = %tab.id, "replaced bottom tab");
                            tabs[index] = tab;
                        }
                        None => warn!(position, tabs = tabs.len(), "tab position out of range"),
                    }
                }
                TabAssignment::Invalid => {
                    warn!(position, "tab directive has no usable id, skipping");
                }
            }
        }

        state.bottom_tabs = tabs;
    }

    fn resolve_tab(&self, tab_id: &str, position: i64) -> Option<BottomTab> {
        let resolver = self.tabs?;
        let config = resolver.tab_action_config(tab_id)?;
        let web_screen_key = config.web_screen_key()?;
        let label = config
            .label_for(self.language)
            .or_else(|| config.label_for(TAB_LABEL_FALLBACK_LOCALE))
            .unwrap_or(tab_id);

        Some(BottomTab {
            id: tab_id.to_owned(),
            label: label.to_owned(),
            icon: resolver.resolve_tab_icon(web_screen_key),
            visible: true,
            position: usize::try_from(position).ok()?,
        })
    }
}

fn no_bucket(screen: &str) -> ApplyOutcome {
    warn!(screen, "screen has no quick actions bucket");
    ApplyOutcome::Ignored(format!("no quick actions bucket for screen {screen:?}"))
}

fn show_content(
    state: &mut AppliedEffectsState,
    list: ListTarget,
    items: &[String],
    screen: &str,
) -> ApplyOutcome {
    let Some(current) = state.list_mut(list, screen) else {
        return no_bucket(screen);
    };
    *current = items.to_vec();
    if list == ListTarget::QuickActions
        && let Some(bucket) = state.bucket_mut(screen)
    {
        bucket.visible = true;
    }
    ApplyOutcome::Applied
}

fn display(
    state: &mut AppliedEffectsState,
    target: DisplayTarget,
    value: &Value,
    screen: &str,
) -> ApplyOutcome {
    let enabled = matches!(value, Value::Bool(true));
    match target {
        DisplayTarget::Header(field) => {
            if state.header.set(field, value) {
                ApplyOutcome::Applied
            } else {
                warn!(field = field.as_str(), value = %value, "header count needs a non-negative integer");
                ApplyOutcome::Ignored(format!("invalid value for header.{}", field.as_str()))
            }
        }
        DisplayTarget::Fab => {
            state.fab.visible = enabled;
            ApplyOutcome::Applied
        }
        DisplayTarget::AllActions
        | DisplayTarget::CustomizeQuickActions
        | DisplayTarget::QuickActions => {
            let Some(bucket) = state.bucket_mut(screen) else {
                return no_bucket(screen);
            };
            match target {
                DisplayTarget::AllActions => bucket.show_all_actions = enabled,
                DisplayTarget::CustomizeQuickActions => bucket.show_customize = enabled,
                _ => bucket.visible = enabled,
            }
            ApplyOutcome::Applied
        }
    }
}

fn style(state: &mut AppliedEffectsState, change: &StyleChange, screen: &str) -> ApplyOutcome {
    match change {
        StyleChange::QuickActionsLayout(layout) => {
            let Some(bucket) = state.bucket_mut(screen) else {
                return no_bucket(screen);
            };
            bucket.layout = *layout;
        }
        StyleChange::PartnerLogo(url) => state.home_image.partner_logo = Some(url.clone()),
        StyleChange::HomeImage { partner_logo, url } => {
            if let Some(partner_logo) = partner_logo {
                state.home_image.partner_logo = Some(partner_logo.clone());
            }
            if let Some(url) = url {
                state.home_image.url = Some(url.clone());
            }
        }
        StyleChange::InventoryDisplay(display_type) => {
            state.inventory.display_type = *display_type;
        }
    }
    ApplyOutcome::Applied
}

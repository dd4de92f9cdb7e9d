// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use serde_json::Value;

use crate::{
    HeaderField, InventoryDisplayType, QuickActionsLayout, RawCause, RawEffect, RawRule,
};

pub const START_SCREEN: &str = "start";
pub const GLOBAL_SCREEN: &str = "global";
pub const EXPENSES_SCREEN: &str = "expenses";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Nin,
    Contains,
}

impl Operator {
    pub const ALL: [Self; 9] = [
        Self::Eq,
        Self::Ne,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
        Self::Nin,
        Self::Contains,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
            Self::Nin => "nin",
            Self::Contains => "contains",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            "nin" => Some(Self::Nin),
            "contains" => Some(Self::Contains),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Only an explicit `OR` switches the combinator; anything else is `AND`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("OR") => Self::Or,
            _ => Self::And,
        }
    }
}

/// A single normalized cause. Both authoring forms (`field` and
/// `dataSource` + `path`) are folded into `path` at ingestion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCause")]
pub struct Condition {
    pub path: Option<String>,
    pub operator: Option<Operator>,
    /// `None` is an absent comparison value, distinct from JSON `null`.
    pub expected: Option<Value>,
    pub combinator: LogicalOperator,
    pub active: bool,
}

impl Condition {
    pub fn new(path: &str, operator: Operator, expected: Value) -> Self {
        Self {
            path: Some(path.to_owned()),
            operator: Some(operator),
            expected: Some(expected),
            combinator: LogicalOperator::And,
            active: true,
        }
    }

    pub fn or(mut self) -> Self {
        self.combinator = LogicalOperator::Or;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A named bundle of causes and effects. Only a truthy `active` enables it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawRule")]
pub struct Rule {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub causes: Vec<Condition>,
    pub effects: Vec<Effect>,
}

impl Rule {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_owned(),
            description: None,
            active: true,
            causes: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn with_cause(mut self, cause: Condition) -> Self {
        self.causes.push(cause);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ShowContent,
    Filter,
    Display,
    Style,
    Toggle,
    ReplaceTabs,
}

impl ActionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShowContent => "showContent",
            Self::Filter => "filter",
            Self::Display => "display",
            Self::Style => "style",
            Self::Toggle => "toggle",
            Self::ReplaceTabs => "replaceTabs",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "showContent" => Some(Self::ShowContent),
            "filter" => Some(Self::Filter),
            "display" => Some(Self::Display),
            "style" => Some(Self::Style),
            "toggle" => Some(Self::Toggle),
            "replaceTabs" => Some(Self::ReplaceTabs),
            _ => None,
        }
    }
}

/// Ordered id lists that `showContent` and `filter` operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Shortcuts,
    StartPlates,
    /// The quick-actions bucket of the screen being rendered.
    QuickActions,
}

impl ListTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shortcuts => "shortcuts",
            Self::StartPlates => "startPlates",
            Self::QuickActions => "quickActions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    Header(HeaderField),
    Fab,
    AllActions,
    CustomizeQuickActions,
    QuickActions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDirective {
    pub id: String,
    pub show: Option<bool>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleChange {
    QuickActionsLayout(QuickActionsLayout),
    PartnerLogo(String),
    HomeImage {
        partner_logo: Option<String>,
        url: Option<String>,
    },
    InventoryDisplay(InventoryDisplayType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAssignment {
    Hide,
    Replace(String),
    /// The directive carried no usable `id`.
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDirective {
    /// `None` when the authored position is not an integer.
    pub position: Option<i64>,
    pub assignment: TabAssignment,
}

/// Effect payload, validated per action at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectAction {
    ShowContent {
        list: ListTarget,
        items: Vec<String>,
    },
    Filter {
        list: ListTarget,
        directives: Vec<FilterDirective>,
    },
    Display {
        target: DisplayTarget,
        value: Value,
    },
    Style(StyleChange),
    Toggle {
        target: DisplayTarget,
        value: Value,
    },
    ReplaceTabs(Vec<TabDirective>),
    /// A known action whose target, section, or payload did not resolve.
    Unresolved {
        action: ActionKind,
        target: Option<String>,
        section: Option<String>,
    },
    Unrecognized(String),
}

impl EffectAction {
    pub fn name(&self) -> &str {
        match self {
            Self::ShowContent { .. } => ActionKind::ShowContent.as_str(),
            Self::Filter { .. } => ActionKind::Filter.as_str(),
            Self::Display { .. } => ActionKind::Display.as_str(),
            Self::Style(_) => ActionKind::Style.as_str(),
            Self::Toggle { .. } => ActionKind::Toggle.as_str(),
            Self::ReplaceTabs(_) => ActionKind::ReplaceTabs.as_str(),
            Self::Unresolved { action, .. } => action.as_str(),
            Self::Unrecognized(action) => action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEffect")]
pub struct Effect {
    pub action: EffectAction,
    pub screen: Option<String>,
    pub active: bool,
}

impl Effect {
    pub fn new(action: EffectAction) -> Self {
        Self {
            action,
            screen: None,
            active: true,
        }
    }

    pub fn on_screen(mut self, screen: &str) -> Self {
        self.screen = Some(screen.to_owned());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Scope of the effect; unscoped effects belong to the start screen.
    pub fn screen(&self) -> &str {
        self.screen.as_deref().unwrap_or(START_SCREEN)
    }
}

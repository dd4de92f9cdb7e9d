// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{BuiltinTabLabels, ListTarget, TabLabels};

pub const DEFAULT_ASSET_BASE_URL: &str = "https://homer-assets.s3.eu-west-1.amazonaws.com";
pub const DEFAULT_NAV_DOT_COUNT: u32 = 3;
pub const BOTTOM_TAB_COUNT: usize = 5;

/// Fixed bottom tabs as `(tab id, icon key)`, in position order.
pub const DEFAULT_TABS: [(&str, &str); BOTTOM_TAB_COUNT] = [
    ("start", "key"),
    ("inventory", "inventory"),
    ("expenses", "expenses"),
    ("timeline", "timeline"),
    ("lists", "tasks"),
];

pub fn nav_icon_url(asset_base_url: &str, icon_key: &str) -> String {
    format!(
        "{}/icons_app/{icon_key}_nav.png",
        asset_base_url.trim_end_matches('/')
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Avatars,
    HomeInfo,
    UserSettings,
    ExpandCollapse,
    Ellipsis,
    SearchAsk,
    Search,
    Ask,
    NavDots,
    NavDotCount,
    ActiveNavDot,
}

impl HeaderField {
    pub const ALL: [Self; 11] = [
        Self::Avatars,
        Self::HomeInfo,
        Self::UserSettings,
        Self::ExpandCollapse,
        Self::Ellipsis,
        Self::SearchAsk,
        Self::Search,
        Self::Ask,
        Self::NavDots,
        Self::NavDotCount,
        Self::ActiveNavDot,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avatars => "avatars",
            Self::HomeInfo => "homeInfo",
            Self::UserSettings => "userSettings",
            Self::ExpandCollapse => "expandCollapse",
            Self::Ellipsis => "ellipsis",
            Self::SearchAsk => "searchAsk",
            Self::Search => "search",
            Self::Ask => "ask",
            Self::NavDots => "navDots",
            Self::NavDotCount => "navDotCount",
            Self::ActiveNavDot => "activeNavDot",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }

    pub const fn is_count(self) -> bool {
        matches!(self, Self::NavDotCount | Self::ActiveNavDot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderState {
    pub avatars: bool,
    pub home_info: bool,
    pub user_settings: bool,
    pub expand_collapse: bool,
    pub ellipsis: bool,
    pub search_ask: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ask: Option<bool>,
    pub nav_dots: bool,
    pub nav_dot_count: u32,
    pub active_nav_dot: u32,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            avatars: false,
            home_info: false,
            user_settings: false,
            expand_collapse: false,
            ellipsis: false,
            search_ask: false,
            search: None,
            ask: None,
            nav_dots: false,
            nav_dot_count: DEFAULT_NAV_DOT_COUNT,
            active_nav_dot: 0,
        }
    }
}

impl HeaderState {
    /// Flags become `true` only for a literal JSON `true`; counts need a
    /// non-negative integer. Returns `false` when the value was rejected.
    pub fn set(&mut self, field: HeaderField, value: &Value) -> bool {
        let enabled = matches!(value, Value::Bool(true));
        match field {
            HeaderField::Avatars => self.avatars = enabled,
            HeaderField::HomeInfo => self.home_info = enabled,
            HeaderField::UserSettings => self.user_settings = enabled,
            HeaderField::ExpandCollapse => self.expand_collapse = enabled,
            HeaderField::Ellipsis => self.ellipsis = enabled,
            HeaderField::SearchAsk => self.search_ask = enabled,
            HeaderField::Search => self.search = Some(enabled),
            HeaderField::Ask => self.ask = Some(enabled),
            HeaderField::NavDots => self.nav_dots = enabled,
            HeaderField::NavDotCount | HeaderField::ActiveNavDot => {
                let Some(count) = value.as_u64().and_then(|raw| u32::try_from(raw).ok()) else {
                    return false;
                };
                if field == HeaderField::NavDotCount {
                    self.nav_dot_count = count;
                } else {
                    self.active_nav_dot = count;
                }
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_logo: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickActionsLayout {
    #[default]
    Grid,
    List,
}

impl QuickActionsLayout {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    /// Anything other than `list` lays out as a grid.
    pub fn normalize(value: &str) -> Self {
        if value == "list" { Self::List } else { Self::Grid }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickActionsConfig {
    pub visible: bool,
    pub items: Vec<String>,
    pub layout: QuickActionsLayout,
    pub show_customize: bool,
    pub show_all_actions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Start,
    Inventory,
    Expenses,
    Timeline,
    Lists,
}

impl Bucket {
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::Inventory,
        Self::Expenses,
        Self::Timeline,
        Self::Lists,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Inventory => "inventory",
            Self::Expenses => "expenses",
            Self::Timeline => "timeline",
            Self::Lists => "lists",
        }
    }

    /// Every `expenses*` sub-screen shares the `expenses` bucket.
    pub fn for_screen(screen: &str) -> Option<Self> {
        if screen.starts_with("expenses") {
            return Some(Self::Expenses);
        }
        match screen {
            "start" => Some(Self::Start),
            "inventory" => Some(Self::Inventory),
            "timeline" => Some(Self::Timeline),
            "lists" => Some(Self::Lists),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuickActions {
    pub start: QuickActionsConfig,
    pub inventory: QuickActionsConfig,
    pub expenses: QuickActionsConfig,
    pub timeline: QuickActionsConfig,
    pub lists: QuickActionsConfig,
}

impl QuickActions {
    pub fn get(&self, bucket: Bucket) -> &QuickActionsConfig {
        match bucket {
            Bucket::Start => &self.start,
            Bucket::Inventory => &self.inventory,
            Bucket::Expenses => &self.expenses,
            Bucket::Timeline => &self.timeline,
            Bucket::Lists => &self.lists,
        }
    }

    pub fn get_mut(&mut self, bucket: Bucket) -> &mut QuickActionsConfig {
        match bucket {
            Bucket::Start => &mut self.start,
            Bucket::Inventory => &mut self.inventory,
            Bucket::Expenses => &mut self.expenses,
            Bucket::Timeline => &mut self.timeline,
            Bucket::Lists => &mut self.lists,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FabState {
    pub visible: bool,
}

impl Default for FabState {
    fn default() -> Self {
        Self { visible: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottomTab {
    pub id: String,
    pub label: String,
    pub icon: String,
    pub visible: bool,
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryDisplayType {
    #[default]
    List,
    Microcards,
    Grid,
    Large,
    Table,
}

impl InventoryDisplayType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Microcards => "microcards",
            Self::Grid => "grid",
            Self::Large => "large",
            Self::Table => "table",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "list" => Some(Self::List),
            "microcards" => Some(Self::Microcards),
            "grid" => Some(Self::Grid),
            "large" => Some(Self::Large),
            "table" => Some(Self::Table),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryState {
    pub display_type: InventoryDisplayType,
}

/// One screen's resolved UI configuration for a single render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedEffectsState {
    pub header: HeaderState,
    pub home_image: HomeImage,
    pub shortcuts: Vec<String>,
    pub quick_actions: QuickActions,
    pub start_plates: Vec<String>,
    pub fab: FabState,
    pub bottom_tabs: Vec<BottomTab>,
    pub inventory: InventoryState,
}

impl Default for AppliedEffectsState {
    fn default() -> Self {
        Self::initial(&BuiltinTabLabels, "en", DEFAULT_ASSET_BASE_URL)
    }
}

impl AppliedEffectsState {
    pub fn initial(labels: &dyn TabLabels, language: &str, asset_base_url: &str) -> Self {
        let bottom_tabs = DEFAULT_TABS
            .iter()
            .enumerate()
            .map(|(position, (id, icon_key))| BottomTab {
                id: (*id).to_owned(),
                label: labels.tab_label(id, language),
                icon: nav_icon_url(asset_base_url, icon_key),
                visible: true,
                position,
            })
            .collect();

        Self {
            header: HeaderState::default(),
            home_image: HomeImage::default(),
            shortcuts: Vec::new(),
            quick_actions: QuickActions::default(),
            start_plates: Vec::new(),
            fab: FabState::default(),
            bottom_tabs,
            inventory: InventoryState::default(),
        }
    }

    pub fn bucket_mut(&mut self, screen: &str) -> Option<&mut QuickActionsConfig> {
        Bucket::for_screen(screen).map(|bucket| self.quick_actions.get_mut(bucket))
    }

    /// The ordered id list a list target refers to while rendering `screen`.
    pub fn list_mut(&mut self, list: ListTarget, screen: &str) -> Option<&mut Vec<String>> {
        match list {
            ListTarget::Shortcuts => Some(&mut self.shortcuts),
            ListTarget::StartPlates => Some(&mut self.start_plates),
            ListTarget::QuickActions => self.bucket_mut(screen).map(|bucket| &mut bucket.items),
        }
    }
}

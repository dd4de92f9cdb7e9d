// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const EXPENSES_SCREEN_SECTION: &str = "expensesScreen";
pub const ACTIVE_SUBTAB_FIELD: &str = "activeSubtab";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSection {
    User,
    Home,
    UserActivity,
    HomeActivity,
    ExpensesScreen,
}

impl ContextSection {
    pub const ALL: [Self; 5] = [
        Self::User,
        Self::Home,
        Self::UserActivity,
        Self::HomeActivity,
        Self::ExpensesScreen,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Home => "home",
            Self::UserActivity => "userActivity",
            Self::HomeActivity => "homeActivity",
            Self::ExpensesScreen => EXPENSES_SCREEN_SECTION,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "home" => Some(Self::Home),
            "userActivity" => Some(Self::UserActivity),
            "homeActivity" => Some(Self::HomeActivity),
            EXPENSES_SCREEN_SECTION => Some(Self::ExpensesScreen),
            _ => None,
        }
    }
}

/// Result of walking a dotted path through the context.
///
/// `Missing` is a path whose last segment has no value, while `Unreachable`
/// means an earlier segment was null, absent, or not a mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Unreachable,
    Missing,
    Value(&'a Value),
}

impl<'a> Lookup<'a> {
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unreachable | Self::Missing => None,
        }
    }
}

/// Runtime facts keyed by section name (`user`, `home`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    sections: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(sections) => Ok(Self { sections }),
            other => bail!(
                "context must be a JSON object keyed by section name, got {}",
                json_kind(&other)
            ),
        }
    }

    pub fn with_section(mut self, name: impl Into<String>, value: Value) -> Self {
        self.sections.insert(name.into(), value);
        self
    }

    pub fn section(&self, section: ContextSection) -> Option<&Value> {
        self.sections.get(section.as_str())
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Walks `path` segment by segment. Arrays are not indexed.
    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return Lookup::Missing;
        };

        let mut current = self.sections.get(first);
        for segment in segments {
            let Some(value) = current else {
                return Lookup::Unreachable;
            };
            current = match value {
                Value::Null => return Lookup::Unreachable,
                Value::Object(map) => map.get(segment),
                _ => None,
            };
        }

        current.map_or(Lookup::Missing, Lookup::Value)
    }

    pub fn active_subtab(&self) -> Option<&str> {
        self.sections
            .get(EXPENSES_SCREEN_SECTION)
            .and_then(|section| section.get(ACTIVE_SUBTAB_FIELD))
            .and_then(Value::as_str)
            .filter(|subtab| !subtab.is_empty())
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

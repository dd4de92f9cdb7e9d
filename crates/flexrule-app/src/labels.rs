// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const FALLBACK_LANGUAGE: &str = "en";

/// Label lookup for the fixed bottom tabs.
pub trait TabLabels {
    fn tab_label(&self, tab_id: &str, language: &str) -> String;
}

/// Built-in translations for the five default tabs.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTabLabels;

const TAB_LABELS: &[(&str, [&str; 5])] = &[
    ("en", ["Start", "Inventory", "Expenses", "Timeline", "Lists"]),
    ("es", ["Inicio", "Inventario", "Gastos", "Cronología", "Listas"]),
    ("fr", ["Accueil", "Inventaire", "Dépenses", "Chronologie", "Listes"]),
    ("de", ["Start", "Inventar", "Ausgaben", "Zeitleiste", "Listen"]),
    ("it", ["Home", "Inventario", "Spese", "Cronologia", "Liste"]),
    ("pt", ["Início", "Inventário", "Despesas", "Cronologia", "Listas"]),
    ("nl", ["Start", "Inventaris", "Uitgaven", "Tijdlijn", "Lijsten"]),
];

const TAB_IDS: [&str; 5] = ["start", "inventory", "expenses", "timeline", "lists"];

impl BuiltinTabLabels {
    fn lookup(tab_id: &str, language: &str) -> Option<&'static str> {
        let index = TAB_IDS.iter().position(|id| *id == tab_id)?;
        TAB_LABELS
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, labels)| labels[index])
    }
}

impl TabLabels for BuiltinTabLabels {
    /// Tries the exact language, then its base (`en-GB` -> `en`), then
    /// English, then the raw tab id.
    fn tab_label(&self, tab_id: &str, language: &str) -> String {
        let base = language.split(['-', '_']).next().unwrap_or(language);
        Self::lookup(tab_id, language)
            .or_else(|| Self::lookup(tab_id, base))
            .or_else(|| Self::lookup(tab_id, FALLBACK_LANGUAGE))
            .map_or_else(|| tab_id.to_owned(), str::to_owned)
    }
}

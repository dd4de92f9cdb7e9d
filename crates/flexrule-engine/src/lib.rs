// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod apply;
pub mod engine;
pub mod evaluate;
pub mod matcher;
pub mod sources;

pub use apply::{ApplyOutcome, EffectApplier, apply_filter, screen_matches};
pub use engine::{RenderReport, RenderRequest, RuleEngine};
pub use evaluate::evaluate;
pub use matcher::{InactiveCauseMode, conditions_match, matches};
pub use sources::{
    DefaultEffectsSource, NoDefaultEffects, StaticDefaultEffects, TabActionConfig, TabConfig,
    TabLocale, TabResolver,
};

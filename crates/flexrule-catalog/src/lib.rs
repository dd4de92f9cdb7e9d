// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod cache;
mod client;
mod flex;

pub use cache::TtlCache;
pub use client::{CatalogClient, parse_base_url, validate_version};
pub use flex::{FlexFeatures, RemoteCatalog, default_effects_from_value, parse_default_effects};

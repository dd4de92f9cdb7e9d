// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod context;
pub mod ingest;
pub mod labels;
pub mod model;
pub mod state;

pub use context::*;
pub use ingest::*;
pub use labels::*;
pub use model::*;
pub use state::*;

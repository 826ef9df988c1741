// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod loader;
pub mod normalize;
pub mod search;

pub use loader::*;
pub use normalize::*;
pub use search::*;

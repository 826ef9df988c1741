// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod color;
pub mod headers;
pub mod model;
pub mod settings;
pub mod state;

pub use color::*;
pub use headers::*;
pub use model::*;
pub use settings::*;
pub use state::*;

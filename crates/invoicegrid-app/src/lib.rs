// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod demo;
pub mod filter;
pub mod highlight;
pub mod model;
pub mod sort;
pub mod state;
pub mod store;

pub use demo::*;
pub use filter::*;
pub use highlight::*;
pub use model::*;
pub use sort::*;
pub use state::*;
pub use store::*;

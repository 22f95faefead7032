// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod batch;
pub mod controller;
pub mod error;
pub mod forms;
pub mod ids;
pub mod model;
pub mod remote;
pub mod selection;
pub mod state;
pub mod tasks;
pub mod views;

pub use batch::*;
pub use controller::*;
pub use error::*;
pub use forms::*;
pub use ids::*;
pub use model::*;
pub use remote::*;
pub use selection::*;
pub use state::*;
pub use tasks::*;
pub use views::*;

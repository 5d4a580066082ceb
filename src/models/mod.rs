// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod app;
pub mod neighbor;
pub mod post;
pub mod project;

pub use app::{App, AppSummary, UserApp};
pub use neighbor::Neighbor;
pub use post::{DevlogSubmission, LatestPost};
pub use project::Project;

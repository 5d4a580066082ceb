// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - third-party integrations.

pub mod hackatime;
pub mod loops;
pub mod otp;

pub use hackatime::HackatimeClient;
pub use loops::LoopsClient;

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input patterns shared by request DTOs.
//!
//! Request types derive [`validator::Validate`] and point at these patterns,
//! so every handler rejects malformed input the same way before touching the
//! record store.

use regex::Regex;
use std::sync::LazyLock;

/// Opaque per-user credential.
pub static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{10,}$").expect("valid token pattern"));

pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s_-]{3,50}$").expect("valid project pattern"));

/// `github.com/<owner>/<repo>`, scheme and `www.` optional.
pub static GITHUB_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?github\.com/[A-Za-z0-9_-]+/[A-Za-z0-9_-]+$")
        .expect("valid github pattern")
});

pub static HTTP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("valid url pattern"));

/// Hackatime user ids are numeric ids or slugs.
pub static HACKATIME_USER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").expect("valid user id pattern"));

pub fn is_valid_token(token: &str) -> bool {
    TOKEN_RE.is_match(token)
}

/// Rejects strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

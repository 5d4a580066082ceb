//! Neighbor (user) model.

use crate::db::store::Record;

/// Field names in the neighbors table.
pub mod fields {
    pub const TOKEN: &str = "token";
    pub const EMAIL: &str = "email";
    pub const HAS_HACKATIME_AT: &str = "hasHackatimeAt";
    pub const HACKTENDO_SIGNUP: &str = "hacktendoSignup";
    /// Display name candidates, most preferred first.
    pub const DISPLAY_NAMES: [&str; 3] = [
        "Full Name",
        "Slack Handle (from slackNeighbor)",
        "Full Name (from slackNeighbor)",
    ];
}

/// Registered member, resolved fresh from the store on every request.
#[derive(Debug, Clone)]
pub struct Neighbor {
    /// Record id (used in membership lists)
    pub id: String,
    pub email: Option<String>,
    /// When Hackatime projects were first seen for this neighbor
    pub has_hackatime_at: Option<String>,
}

impl From<Record> for Neighbor {
    fn from(record: Record) -> Self {
        Self {
            email: record.str_field(fields::EMAIL).map(str::to_string),
            has_hackatime_at: record
                .str_field(fields::HAS_HACKATIME_AT)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            id: record.id,
        }
    }
}

/// Name to show for a neighbor or app record, falling back to its id.
pub fn display_name(record: &Record) -> String {
    fields::DISPLAY_NAMES
        .iter()
        .chain(std::iter::once(&crate::models::app::fields::NAME))
        .find_map(|f| record.str_field(f).filter(|s| !s.is_empty()))
        .unwrap_or(record.id.as_str())
        .to_string()
}

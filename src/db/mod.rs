//! Database layer (remote record store).

pub mod airtable;
pub mod formula;
pub mod memory;
pub mod records;
pub mod store;

pub use airtable::AirtableStore;
pub use formula::Formula;
pub use memory::MemoryStore;
pub use records::Database;
pub use store::{Query, Record, RecordStore};

/// Table names as constants. The users table name is configurable.
pub mod tables {
    pub const APPS: &str = "Apps";
    pub const PROJECTS: &str = "hackatimeProjects";
    pub const POSTS: &str = "Posts";
    pub const OTP: &str = "OTP";
}

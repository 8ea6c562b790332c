//! UUID utilities
//!
//! Rows created through the admin API use UUIDv4 text ids.

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new UUIDv4 as a hyphenated string row id
pub fn generate_id() -> String {
    generate().to_string()
}

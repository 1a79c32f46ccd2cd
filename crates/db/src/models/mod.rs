//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` + `Validate` DTOs for inserts and patches

pub mod authoring_session;
pub mod post;
pub mod scheduled_post;
pub mod user;

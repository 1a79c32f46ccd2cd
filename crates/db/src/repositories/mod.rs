//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod authoring_session_repo;
pub mod post_repo;
pub mod scheduled_post_repo;
pub mod user_repo;

pub use authoring_session_repo::AuthoringSessionRepo;
pub use post_repo::PostRepo;
pub use scheduled_post_repo::ScheduledPostRepo;
pub use user_repo::UserRepo;

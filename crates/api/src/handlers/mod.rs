pub mod auth;
pub mod authoring;
pub mod post;
pub mod scheduled_post;
pub mod user;

//! BlogCraft domain logic.
//!
//! Everything in this crate is free of I/O: the authoring workflow, grammar
//! edit application, publication helpers and the traits through which the
//! outer crates reach the hosted text, grammar, spreadsheet and blog
//! services.

pub mod error;
pub mod grammar;
pub mod prompts;
pub mod publication;
pub mod roles;
pub mod services;
pub mod types;
pub mod validation;
pub mod workflow;

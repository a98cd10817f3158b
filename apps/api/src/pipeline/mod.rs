// Content pipeline: idea → draft use-cases and their status transitions.
// Every status write goes through status::validate_transition first.

pub mod context;
pub mod drafts;
pub mod handlers;
pub mod ideas;

// Content strategy: pillars, audiences, and the weighted links between them.

pub mod handlers;
pub mod links;

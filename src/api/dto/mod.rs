//! Data Transfer Objects for API requests and responses.
//!
//! Field names follow the public JSON contract (`fullURL`, `shortCode`,
//! `userUUID`); request bodies are checked with `validator`.

pub mod analytics;
pub mod health;
pub mod links;

//! Scenario specs. Each is an async fn `(&TestContext) -> anyhow::Result<()>`
//! that provisions what it needs, drives the server through per-actor
//! sessions, and `ensure!`s on statuses and bodies.

pub mod authz;
pub mod contacts;
pub mod files;
pub mod groups;
pub mod messages;
pub mod nodes;
pub mod sites;
pub mod trusted_auth;
pub mod users;
pub mod versions;

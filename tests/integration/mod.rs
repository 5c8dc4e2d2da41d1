//! Integration tests for corsd
//!
//! Each test boots the real server in-process on an ephemeral port over a
//! temporary document root and talks to it with reqwest.
//!
//! The alt_text module probes the external alt-text service and is ignored
//! by default; run it with: cargo test --test integration -- --ignored

mod helpers;

mod connections;

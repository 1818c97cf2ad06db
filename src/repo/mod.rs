//! Typed repositories: row-to-entity mapping over the connection pool.
//!
//! Error policy: read paths absorb storage failures into empty/None/false
//! sentinels after logging, so browsing stays resilient; `create` propagates
//! so the caller can report the write failure.

pub mod question;
pub mod result;
pub mod user;

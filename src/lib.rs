//! Quizdesk core: embedded question store with versioned migrations, typed
//! repositories, and the timed quiz session engine. The desktop shell sits on
//! top of `app::*` and owns everything visual.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod repo;

//! projman - users, projects and tasks in a flat file
//!
//! This library provides the core of the projman CLI: an in-memory
//! ownership graph (users own projects, projects own tasks) and a JSON
//! store that reproduces the same graph across runs.
//!
//! # Core Concepts
//!
//! - **Entities**: [`User`], [`Project`] and [`Task`], each with validated
//!   fields and a numeric id
//! - **Registry**: the loaded graph plus the id allocator that numbers new
//!   entities
//! - **Store**: the JSON file the registry is loaded from and saved to
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.projman.toml`
//! - `error`: Error types and result aliases
//! - `ids`: Typed identifiers and the id allocator
//! - `validate`: Field validation rules
//! - `user`, `project`, `task`: The entity model
//! - `registry`: The in-memory graph and its mutations
//! - `query`: Read-only lookups over users
//! - `store`: JSON persistence and backups
//! - `output`: Human and JSON output formatting

pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod output;
pub mod project;
pub mod query;
pub mod registry;
pub mod store;
pub mod task;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
pub use ids::{IdAllocator, ProjectId, TaskId, UserId};
pub use project::Project;
pub use registry::{Registry, UserRef};
pub use store::Store;
pub use task::{Task, TaskStatus};
pub use user::User;

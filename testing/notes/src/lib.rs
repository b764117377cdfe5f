//! A small note-taking schema exercising every tabula attribute: a table
//! with accessor-backed private columns, a custom type adapter, foreign
//! keys, versioned migrations and a repository override.

pub mod adapters;
pub mod migrations;
pub mod model;
pub mod repos;

/// Model adapters, repositories and `REGISTRATION`, written by `build.rs`.
#[allow(clippy::all, clippy::pedantic, clippy::nursery)]
pub mod generated {
    include!(concat!(env!("OUT_DIR"), "/tabula.rs"));
}

pub use generated::REGISTRATION;

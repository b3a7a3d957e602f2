//! Cinematic Toolkit
//!
//! Builds the JSON schema for cinematic documents (shots of camera setups and
//! dialog nodes), validates documents against it, and provides a file-based
//! authoring CLI around plain YAML files.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
pub mod yaml;

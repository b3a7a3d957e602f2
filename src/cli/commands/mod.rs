//! CLI command implementations

pub mod cinematic;
pub mod completions;
pub mod init;
pub mod schema;
pub mod validate;

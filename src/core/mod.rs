//! Core module - fundamental types and utilities

pub mod config;
pub mod entity;
pub mod loader;
pub mod project;
pub mod slug;

pub use config::Config;
pub use entity::Entity;
pub use project::{Project, ProjectError};
pub use slug::slugify;

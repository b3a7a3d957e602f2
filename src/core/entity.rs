//! Entity trait - common interface for stored documents

use serde::{de::DeserializeOwned, Serialize};

/// A document stored as a YAML file and validated against a registry schema
pub trait Entity: Serialize + DeserializeOwned {
    /// Registry name of the schema this document is validated against
    const SCHEMA: &'static str;

    /// Display name
    fn name(&self) -> &str;

    /// URL-safe identifier, also used as the file stem
    fn slug(&self) -> &str;
}

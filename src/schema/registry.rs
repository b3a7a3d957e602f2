//! Schema registry - named access to the cinematic schema and its parts

use serde_json::Value;

use crate::schema::cinematic;

/// Name of the top-level document schema
pub const CINEMATIC: &str = "cinematic";

/// All built schemas, keyed by name
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<(&'static str, Value)>,
}

impl SchemaRegistry {
    /// Build every schema
    pub fn new() -> Self {
        let schemas = vec![
            (CINEMATIC, cinematic::cinematic_schema()),
            ("shot", cinematic::shot_schema()),
            ("shot-setup", cinematic::shot_setup_schema()),
            ("dialog-node", cinematic::dialog_node_schema()),
            ("character", cinematic::character_schema("Character")),
            (
                "thang-type",
                cinematic::thang_type_schema("ThangType", "A ThangType asset referenced by slug"),
            ),
        ];
        tracing::debug!(count = schemas.len(), "built schema registry");
        Self { schemas }
    }

    /// Look up a schema by name. `Dialog_Node` and `dialog-node` are the same.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let wanted = normalize(name);
        self.schemas
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, schema)| schema)
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Schema names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(|(n, _)| *n)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schemas.iter().map(|(n, s)| (*n, s))
    }

    /// Pretty-printed JSON for a schema
    pub fn to_pretty_json(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(|schema| serde_json::to_string_pretty(schema).ok())
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_cinematic() {
        let registry = SchemaRegistry::default();
        assert!(registry.has_schema(CINEMATIC));
        assert_eq!(registry.get(CINEMATIC).unwrap()["title"], "Cinematic");
    }

    #[test]
    fn test_lookup_is_forgiving() {
        let registry = SchemaRegistry::default();
        assert!(registry.has_schema("Dialog_Node"));
        assert!(registry.has_schema(" shot-setup "));
        assert!(!registry.has_schema("music"));
    }

    #[test]
    fn test_names_order() {
        let registry = SchemaRegistry::default();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names[0], CINEMATIC);
        assert_eq!(names.len(), 6);
    }

    #[test]
    fn test_pretty_json_parses_back() {
        let registry = SchemaRegistry::default();
        let text = registry.to_pretty_json("thang-type").unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["required"][0], "slug");
    }
}

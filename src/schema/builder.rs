//! Schema builder helpers
//!
//! Small constructors that assemble JSON-Schema fragments. Every helper takes
//! an extension object that is merged over the helper's base schema, so
//! callers only spell out what differs (title, description, enum, default...).

use serde_json::{json, Map, Value};

/// Maximum length applied to every short string
pub const SHORT_STRING_MAX_LENGTH: u64 = 100;

/// Merge `ext` over `base`, key by key. Extension keys win.
///
/// Only top-level keys are merged; nested objects in `ext` replace the base
/// value wholesale. A non-object extension leaves `base` untouched.
pub fn combine(mut base: Value, ext: Value) -> Value {
    if let (Some(target), Value::Object(ext)) = (base.as_object_mut(), ext) {
        for (key, value) in ext {
            target.insert(key, value);
        }
    }
    base
}

/// An object schema with a closed property set
pub fn object(ext: Value, props: Value) -> Value {
    let props = match props {
        Value::Object(_) => props,
        _ => Value::Object(Map::new()),
    };
    combine(
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": props,
        }),
        ext,
    )
}

/// An array schema whose elements match `items`
pub fn array(ext: Value, items: Value) -> Value {
    let items = if items.is_null() { json!({}) } else { items };
    combine(json!({ "type": "array", "items": items }), ext)
}

pub fn short_string(ext: Value) -> Value {
    combine(
        json!({ "type": "string", "maxLength": SHORT_STRING_MAX_LENGTH }),
        ext,
    )
}

pub fn float(ext: Value) -> Value {
    combine(json!({ "type": "number" }), ext)
}

pub fn int(ext: Value) -> Value {
    combine(json!({ "type": "integer" }), ext)
}

/// An `{x, y}` coordinate point. Each call returns a fresh copy.
pub fn point2d(ext: Value) -> Value {
    let point = object(
        json!({
            "title": "Point",
            "description": "An {x, y} coordinate point.",
            "format": "point2d",
            "required": ["x", "y"],
        }),
        json!({
            "x": { "title": "x", "description": "The x coordinate.", "type": "number", "default": 15 },
            "y": { "title": "y", "description": "The y coordinate.", "type": "number", "default": 20 },
        }),
    );
    combine(point, ext)
}

/// A database object id, accepted either as a string or an expanded object
pub fn object_id(ext: Value) -> Value {
    combine(json!({ "type": ["object", "string"] }), ext)
}

fn properties_mut(schema: &mut Value) -> Option<&mut Map<String, Value>> {
    let obj = schema.as_object_mut()?;
    let props = obj
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if !props.is_object() {
        *props = Value::Object(Map::new());
    }
    props.as_object_mut()
}

/// Add the persistence identity fields (`_id`, `__v`) to an object schema.
///
/// `link_fragment` is the collection path segment used in the self link.
pub fn extend_basic_properties(schema: &mut Value, link_fragment: &str) {
    if let Some(props) = properties_mut(schema) {
        props.insert(
            "_id".to_string(),
            object_id(json!({
                "links": [{ "rel": "self", "href": format!("/db/{}/{{($)}}", link_fragment) }],
                "format": "hidden",
            })),
        );
        props.insert(
            "__v".to_string(),
            json!({ "title": "Mongoose Version", "format": "hidden" }),
        );
    }
}

/// Add the `name` and `slug` fields to an object schema
pub fn extend_named_properties(schema: &mut Value) {
    if let Some(props) = properties_mut(schema) {
        props.insert("name".to_string(), short_string(json!({ "title": "Name" })));
        props.insert(
            "slug".to_string(),
            short_string(json!({ "title": "Slug", "format": "hidden" })),
        );
    }
}

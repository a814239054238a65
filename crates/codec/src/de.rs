//! Parsing of wire documents back onto the typed model.
//!
//! Documents are parsed into the generic `serde_json::Value` node model
//! first; the functions here then map named children onto the typed
//! collections. Untyped object content becomes nested property collections
//! with names converted back to PascalCase.

use chrono::DateTime;
use serde_json::{Map, Value};

use folio_model::{
    DataKind, Entity, EntityAction, Field, FieldProvider, FieldType, Link, Method,
    PropertyCollection, Variant,
};

use crate::case;
use crate::error::{CodecError, Result};

/// Maps a parsed document node onto an [`Entity`].
pub fn entity_from_value(value: &Value) -> Result<Entity> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::Malformed("document root must be an object".into()))?;

    let mut entity = Entity::new();
    for class in strings(object, "class") {
        entity.add_class(class);
    }
    if let Some(title) = text(object, "title") {
        entity.set_title(title);
    }
    for rel in strings(object, "rel") {
        entity.add_rel(rel);
    }
    if let Some(properties) = object.get("properties") {
        let map = properties
            .as_object()
            .ok_or_else(|| CodecError::Malformed("'properties' must be an object".into()))?;
        entity.properties = properties_from_object(map);
    }
    if let Some(children) = object.get("entities") {
        for child in array(children, "entities")? {
            entity.add_entity(entity_from_value(child)?);
        }
    }
    if let Some(actions) = object.get("actions") {
        for action in array(actions, "actions")? {
            entity.add_action(action_from_value(action)?);
        }
    }
    if let Some(links) = object.get("links") {
        for link in array(links, "links")? {
            entity.add_link(link_from_value(link)?);
        }
    }
    Ok(entity)
}

/// Maps an untyped object onto a property collection, converting member
/// names back to PascalCase per dot-separated segment.
pub fn properties_from_object(object: &Map<String, Value>) -> PropertyCollection {
    let mut properties = PropertyCollection::new();
    for (name, value) in object {
        properties.set(case::to_model(name), variant_from_value(value));
    }
    properties
}

/// Maps a document node onto a [`Variant`].
///
/// Objects whose members are exactly a non-empty subset of `min`/`max`
/// become ranges; every other object becomes a nested map. Strings in
/// strict RFC 3339 form become date/times.
pub fn variant_from_value(value: &Value) -> Variant {
    match value {
        Value::Null => Variant::Null,
        Value::Bool(b) => Variant::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Variant::Int(i)
            } else {
                Variant::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => Variant::DateTime(dt),
            Err(_) => Variant::Text(s.clone()),
        },
        Value::Array(items) => Variant::List(items.iter().map(variant_from_value).collect()),
        Value::Object(map) => {
            if !map.is_empty() && map.keys().all(|k| k == "min" || k == "max") {
                Variant::Range {
                    min: map.get("min").map(|v| Box::new(variant_from_value(v))),
                    max: map.get("max").map(|v| Box::new(variant_from_value(v))),
                }
            } else {
                Variant::Map(properties_from_object(map))
            }
        }
    }
}

fn link_from_value(value: &Value) -> Result<Link> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::Malformed("link must be an object".into()))?;
    Ok(Link {
        classes: strings(object, "class"),
        rels: strings(object, "rel"),
        title: text(object, "title"),
        href: text(object, "href")
            .ok_or_else(|| CodecError::Malformed("link is missing 'href'".into()))?,
        media_type: text(object, "type"),
    })
}

fn action_from_value(value: &Value) -> Result<EntityAction> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::Malformed("action must be an object".into()))?;
    let mut action = EntityAction {
        classes: strings(object, "class"),
        name: text(object, "name")
            .ok_or_else(|| CodecError::Malformed("action is missing 'name'".into()))?,
        title: text(object, "title"),
        rels: strings(object, "rel"),
        method: Method::default(),
        href: text(object, "href")
            .ok_or_else(|| CodecError::Malformed("action is missing 'href'".into()))?,
        media_type: text(object, "type"),
        fields: Vec::new(),
    };
    if let Some(method) = text(object, "method") {
        action.method = Method::parse(&method)
            .ok_or_else(|| CodecError::Malformed(format!("unknown method '{method}'")))?;
    }
    if let Some(fields) = object.get("fields") {
        for field in array(fields, "fields")? {
            action.fields.push(field_from_value(field)?);
        }
    }
    Ok(action)
}

fn field_from_value(value: &Value) -> Result<Field> {
    let object = value
        .as_object()
        .ok_or_else(|| CodecError::Malformed("field must be an object".into()))?;
    let mut field = Field::new(
        text(object, "name")
            .ok_or_else(|| CodecError::Malformed("field is missing 'name'".into()))?,
    );
    field.field_type = text(object, "type").as_deref().and_then(FieldType::parse);
    field.title = text(object, "title");
    if let Some(v) = object.get("value") {
        field.value = variant_from_value(v);
    }
    field.data_type = text(object, "dataType").as_deref().and_then(DataKind::parse);
    field.classes = strings(object, "class");
    field.rels = strings(object, "rel");
    field.category = text(object, "category");
    field.placeholder = text(object, "placeholder");
    if let Some(provider) = object.get("provider").and_then(Value::as_object) {
        field.provider = Some(FieldProvider {
            href: text(provider, "href").unwrap_or_default(),
            keys: strings(provider, "keys"),
        });
    }
    field.required = flag(object, "required");
    field.read_only = flag(object, "readOnly");
    field.min_length = object.get("minLength").and_then(Value::as_u64).map(|v| v as u32);
    field.max_length = object.get("maxLength").and_then(Value::as_u64).map(|v| v as u32);
    field.pattern = text(object, "pattern");
    field.multiline = flag(object, "multiline");
    field.allow_many = flag(object, "allowMany");
    field.allow_range = flag(object, "allowRange");
    field.allow_wildcards = flag(object, "allowWildcards");
    Ok(field)
}

fn array<'a>(value: &'a Value, member: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| CodecError::Malformed(format!("'{member}' must be an array")))
}

fn text(object: &Map<String, Value>, member: &str) -> Option<String> {
    object
        .get(member)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Reads a string array member; a bare string is accepted as a one-element
/// array.
fn strings(object: &Map<String, Value>, member: &str) -> Vec<String> {
    match object.get(member) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Reads a wire boolean, accepting `1`/`0` as well as JSON booleans.
fn flag(object: &Map<String, Value>, member: &str) -> Option<bool> {
    match object.get(member)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names_back_to_pascal() {
        let entity = entity_from_value(&serde_json::json!({
            "class": ["order"],
            "title": "Order 1",
            "properties": { "id": 7, "customerName": "Ada" }
        }))
        .unwrap();

        assert_eq!(entity.property("Id"), Some(&Variant::Int(7)));
        assert_eq!(
            entity.property("CustomerName"),
            Some(&Variant::Text("Ada".into()))
        );
    }

    #[test]
    fn test_range_detection() {
        let v = variant_from_value(&serde_json::json!({ "min": 5, "max": 10 }));
        assert_eq!(
            v,
            Variant::Range {
                min: Some(Box::new(Variant::Int(5))),
                max: Some(Box::new(Variant::Int(10))),
            }
        );
    }

    #[test]
    fn test_object_becomes_nested_map() {
        let v = variant_from_value(&serde_json::json!({ "street": "Main", "number": 1 }));
        match v {
            Variant::Map(map) => {
                assert_eq!(map.get("Street"), Some(&Variant::Text("Main".into())));
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_rfc3339_string_becomes_datetime() {
        let v = variant_from_value(&serde_json::json!("2024-06-01T10:30:00+02:00"));
        assert!(matches!(v, Variant::DateTime(_)));
        let plain = variant_from_value(&serde_json::json!("Order 1"));
        assert_eq!(plain, Variant::Text("Order 1".into()));
    }

    #[test]
    fn test_link_requires_href() {
        let err = link_from_value(&serde_json::json!({ "rel": ["self"] }));
        assert!(err.is_err());
    }

    #[test]
    fn test_wire_flags() {
        let field = field_from_value(&serde_json::json!({
            "name": "price", "required": 1, "readOnly": 0
        }))
        .unwrap();
        assert_eq!(field.required, Some(true));
        assert_eq!(field.read_only, Some(false));
    }

    #[test]
    fn test_malformed_root() {
        assert!(entity_from_value(&serde_json::json!([1, 2])).is_err());
    }
}

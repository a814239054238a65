//! Serialization of the typed model into the wire dialect.

use serde_json::{Map, Value, json};

use folio_model::{Entity, EntityAction, Field, Link, PropertyCollection, Variant};

use crate::case;

/// Renders an entity subtree as a wire document.
///
/// Member order within each object is: `class`, `title`, `rel`,
/// `properties`, `entities`, `actions`, `links`. Absent and empty members
/// are omitted entirely.
pub fn entity_to_value(entity: &Entity) -> Value {
    let mut out = Map::new();
    put_strings(&mut out, "class", &entity.classes);
    put_text(&mut out, "title", entity.title.as_deref());
    put_strings(&mut out, "rel", &entity.rels);

    let properties = properties_to_value(&entity.properties);
    if let Value::Object(map) = &properties {
        if !map.is_empty() {
            out.insert("properties".into(), properties);
        }
    }

    if !entity.entities.is_empty() {
        let children: Vec<Value> = entity.entities.iter().map(entity_to_value).collect();
        out.insert("entities".into(), Value::Array(children));
    }
    if !entity.actions.is_empty() {
        let actions: Vec<Value> = entity.actions.iter().map(action_to_value).collect();
        out.insert("actions".into(), Value::Array(actions));
    }
    if !entity.links.is_empty() {
        let links: Vec<Value> = entity.links.iter().map(link_to_value).collect();
        out.insert("links".into(), Value::Array(links));
    }
    Value::Object(out)
}

/// Renders a property collection as a wire object, plain members first and
/// metadata members last, with camelCase names.
pub fn properties_to_value(properties: &PropertyCollection) -> Value {
    let mut out = Map::new();
    for property in properties.iter() {
        let value = property.value();
        if value.is_null() || value.is_empty_collection() {
            continue;
        }
        out.insert(case::to_wire(property.name()), variant_to_value(value));
    }
    Value::Object(out)
}

/// Renders a single value.
///
/// Booleans become `1`/`0`; date/times become ISO-8601 text with offset;
/// null elements inside lists are dropped.
pub fn variant_to_value(value: &Variant) -> Value {
    match value {
        Variant::Null => Value::Null,
        Variant::Bool(b) => json!(if *b { 1 } else { 0 }),
        Variant::Int(i) => json!(i),
        Variant::Float(f) => json!(f),
        Variant::Text(s) => json!(s),
        Variant::DateTime(dt) => json!(dt.to_rfc3339()),
        Variant::List(items) => Value::Array(
            items
                .iter()
                .filter(|item| !item.is_null())
                .map(variant_to_value)
                .collect(),
        ),
        Variant::Range { min, max } => {
            let mut out = Map::new();
            if let Some(min) = min {
                out.insert("min".into(), variant_to_value(min));
            }
            if let Some(max) = max {
                out.insert("max".into(), variant_to_value(max));
            }
            Value::Object(out)
        }
        Variant::Map(map) => properties_to_value(map),
    }
}

fn link_to_value(link: &Link) -> Value {
    let mut out = Map::new();
    put_strings(&mut out, "class", &link.classes);
    put_strings(&mut out, "rel", &link.rels);
    put_text(&mut out, "title", link.title.as_deref());
    out.insert("href".into(), json!(link.href));
    put_text(&mut out, "type", link.media_type.as_deref());
    Value::Object(out)
}

fn action_to_value(action: &EntityAction) -> Value {
    let mut out = Map::new();
    put_strings(&mut out, "class", &action.classes);
    out.insert("name".into(), json!(action.name));
    put_text(&mut out, "title", action.title.as_deref());
    put_strings(&mut out, "rel", &action.rels);
    out.insert("method".into(), json!(action.method.as_str()));
    out.insert("href".into(), json!(action.href));
    put_text(&mut out, "type", action.media_type.as_deref());
    if !action.fields.is_empty() {
        let fields: Vec<Value> = action.fields.iter().map(field_to_value).collect();
        out.insert("fields".into(), Value::Array(fields));
    }
    Value::Object(out)
}

fn field_to_value(field: &Field) -> Value {
    let mut out = Map::new();
    out.insert("name".into(), json!(field.name));
    if let Some(field_type) = field.field_type {
        out.insert("type".into(), json!(field_type.as_str()));
    }
    put_text(&mut out, "title", field.title.as_deref());
    if !field.value.is_null() && !field.value.is_empty_collection() {
        out.insert("value".into(), variant_to_value(&field.value));
    }
    if let Some(kind) = field.data_type {
        out.insert("dataType".into(), json!(kind.as_str()));
    }
    put_strings(&mut out, "class", &field.classes);
    put_strings(&mut out, "rel", &field.rels);
    put_text(&mut out, "category", field.category.as_deref());
    put_text(&mut out, "placeholder", field.placeholder.as_deref());
    if let Some(provider) = &field.provider {
        let mut p = Map::new();
        p.insert("href".into(), json!(provider.href));
        if !provider.keys.is_empty() {
            p.insert("keys".into(), json!(provider.keys));
        }
        out.insert("provider".into(), Value::Object(p));
    }
    put_flag(&mut out, "required", field.required);
    put_flag(&mut out, "readOnly", field.read_only);
    if let Some(v) = field.min_length {
        out.insert("minLength".into(), json!(v));
    }
    if let Some(v) = field.max_length {
        out.insert("maxLength".into(), json!(v));
    }
    put_text(&mut out, "pattern", field.pattern.as_deref());
    put_flag(&mut out, "multiline", field.multiline);
    put_flag(&mut out, "allowMany", field.allow_many);
    put_flag(&mut out, "allowRange", field.allow_range);
    put_flag(&mut out, "allowWildcards", field.allow_wildcards);
    Value::Object(out)
}

fn put_text(out: &mut Map<String, Value>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        out.insert(name.into(), json!(value));
    }
}

fn put_strings(out: &mut Map<String, Value>, name: &str, values: &[String]) {
    if !values.is_empty() {
        out.insert(name.into(), json!(values));
    }
}

fn put_flag(out: &mut Map<String, Value>, name: &str, value: Option<bool>) {
    if let Some(value) = value {
        out.insert(name.into(), json!(if value { 1 } else { 0 }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use folio_model::{DataKind, Method};

    #[test]
    fn test_entity_members_and_casing() {
        let mut entity = Entity::new();
        entity.add_class("order");
        entity.set_title("Order 1");
        entity.set_property("Id", Variant::Int(7));

        let json = serde_json::to_string(&entity_to_value(&entity)).unwrap();
        assert!(json.contains(r#""class":["order"]"#));
        assert!(json.contains(r#""title":"Order 1""#));
        assert!(json.contains(r#""id":7"#));
    }

    #[test]
    fn test_null_and_empty_members_omitted() {
        let mut entity = Entity::new();
        entity.set_property("Present", 1);
        entity.set_property("Absent", Variant::Null);
        entity.set_property("Empty", Variant::List(vec![]));

        let json = serde_json::to_string(&entity_to_value(&entity)).unwrap();
        assert!(json.contains("present"));
        assert!(!json.contains("absent"));
        assert!(!json.contains("empty"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_metadata_members_emitted_last() {
        let mut entity = Entity::new();
        entity.set_property("__meta", "m");
        entity.set_property("Id", 1);

        let json = serde_json::to_string(&entity_to_value(&entity)).unwrap();
        let id_at = json.find(r#""id""#).unwrap();
        let meta_at = json.find(r#""__meta""#).unwrap();
        assert!(id_at < meta_at);
    }

    #[test]
    fn test_booleans_as_digits() {
        let mut entity = Entity::new();
        entity.set_property("Active", true);
        let json = serde_json::to_string(&entity_to_value(&entity)).unwrap();
        assert!(json.contains(r#""active":1"#));
    }

    #[test]
    fn test_datetime_with_offset() {
        let dt = DateTime::parse_from_rfc3339("2024-06-01T10:30:00+02:00").unwrap();
        let mut entity = Entity::new();
        entity.set_property("CreatedAt", Variant::DateTime(dt));
        let json = serde_json::to_string(&entity_to_value(&entity)).unwrap();
        assert!(json.contains("2024-06-01T10:30:00+02:00"));
    }

    #[test]
    fn test_action_and_field_members() {
        let mut entity = Entity::new();
        entity.add_action(
            EntityAction::new("filter", "./")
                .with_method(Method::Get)
                .with_field(
                    Field::new("price")
                        .with_data_type(DataKind::Decimal)
                        .required(),
                ),
        );

        let json = serde_json::to_string(&entity_to_value(&entity)).unwrap();
        assert!(json.contains(r#""method":"GET""#));
        assert!(json.contains(r#""dataType":"decimal""#));
        assert!(json.contains(r#""required":1"#));
    }
}

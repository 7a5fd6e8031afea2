use serde_json::{Map, Value};
use crate::models::Tag;
use super::coerce::{field, scalar_string};

const CATEGORY_KEYS: &[&str] = &["key", "category", "tag_key", "tag_category", "category_name"];
const VALUE_KEYS: &[&str] = &["value", "tag_value", "value_name"];

/// Flatten whatever tag shape the platform sent into ordered pairs.
///
/// Recognized shapes: a list of `{key, value}`-style objects, a list of
/// `[category, value]` pairs, or one object mapping category to a value or a
/// list of values. Anything else yields no tags.
pub fn flatten_tags(value: Option<&Value>) -> Vec<Tag> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(tag_from_item).collect(),
        Some(Value::Object(map)) => tags_from_mapping(map),
        _ => Vec::new(),
    }
}

fn tag_from_item(item: &Value) -> Option<Tag> {
    match item {
        Value::Object(obj) => {
            let category = field(obj, CATEGORY_KEYS).and_then(scalar_string)?;
            let value = field(obj, VALUE_KEYS).and_then(scalar_string)?;
            Some(Tag { category, value })
        }
        Value::Array(pair) if pair.len() == 2 => Some(Tag {
            category: scalar_string(&pair[0])?,
            value: scalar_string(&pair[1])?,
        }),
        _ => None,
    }
}

fn tags_from_mapping(map: &Map<String, Value>) -> Vec<Tag> {
    let mut tags = Vec::new();
    for (category, values) in map {
        match values {
            Value::Array(items) => {
                tags.extend(items.iter().filter_map(scalar_string).map(|value| Tag {
                    category: category.clone(),
                    value,
                }));
            }
            other => {
                if let Some(value) = scalar_string(other) {
                    tags.push(Tag { category: category.clone(), value });
                }
            }
        }
    }
    tags
}

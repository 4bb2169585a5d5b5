//! Request-body preconditions for create and update.
//!
//! Runs before the catalog sees a payload. Collects every failing field
//! rather than stopping at the first, and trims `name` and `price` in the
//! body it hands on.

use serde_json::Value;

use crate::error::FieldError;
use crate::model::{DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS};

pub const NAME_MESSAGE: &str = "Name is required and must be less than 100 characters";
pub const PRICE_MESSAGE: &str = "Price is required";
pub const CATEGORIES_MESSAGE: &str = "At least one category is required";
pub const CATEGORY_ITEM_MESSAGE: &str = "Each category must be a string";
pub const DESCRIPTION_MESSAGE: &str = "Description must be less than 500 characters";
pub const DESCRIPTION_TYPE_MESSAGE: &str = "Description must be a string";
pub const BODY_MESSAGE: &str = "Request body must be a JSON object";

/// Check a plant payload, returning the sanitized body or every field error.
pub fn validate_plant(body: Value) -> Result<Value, Vec<FieldError>> {
    let mut map = match body {
        Value::Object(map) => map,
        other => return Err(vec![FieldError::body("", Some(other), BODY_MESSAGE)]),
    };
    let mut errors = Vec::new();

    match trimmed(map.get("name")) {
        Some(name) if (1..=NAME_MAX_CHARS).contains(&name.chars().count()) => {
            map.insert("name".into(), Value::String(name));
        }
        _ => errors.push(FieldError::body("name", map.get("name").cloned(), NAME_MESSAGE)),
    }

    match trimmed(map.get("price")) {
        Some(price) if !price.is_empty() => {
            map.insert("price".into(), Value::String(price));
        }
        _ => errors.push(FieldError::body("price", map.get("price").cloned(), PRICE_MESSAGE)),
    }

    match map.get("categories") {
        Some(Value::Array(items)) if !items.is_empty() => {
            for (i, item) in items.iter().enumerate() {
                if !item.is_string() {
                    errors.push(FieldError::body(
                        format!("categories[{i}]"),
                        Some(item.clone()),
                        CATEGORY_ITEM_MESSAGE,
                    ));
                }
            }
        }
        other => errors.push(FieldError::body("categories", other.cloned(), CATEGORIES_MESSAGE)),
    }

    match map.get("description") {
        None | Some(Value::Null) => {}
        Some(Value::String(description)) => {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                errors.push(FieldError::body(
                    "description",
                    Some(Value::String(description.clone())),
                    DESCRIPTION_MESSAGE,
                ));
            }
        }
        Some(other) => errors.push(FieldError::body(
            "description",
            Some(other.clone()),
            DESCRIPTION_TYPE_MESSAGE,
        )),
    }

    if errors.is_empty() {
        Ok(Value::Object(map))
    } else {
        Err(errors)
    }
}

fn trimmed(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.trim().to_string()),
        _ => None,
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::PlantId;
use crate::error::StoreError;

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Keys the store owns; a `$set` document can never overwrite them.
const PROTECTED_KEYS: [&str; 3] = ["_id", "createdAt", "updatedAt"];

/// A catalog item as persisted and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(rename = "_id")]
    pub id: PlantId,
    pub name: String,
    /// Free-form text; compared lexicographically.
    pub price: String,
    /// Stored verbatim. Seed data keeps one comma-joined label string per item.
    pub categories: Vec<String>,
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Create payload: everything but the store-assigned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlant {
    pub name: String,
    pub price: String,
    pub categories: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_in_stock() -> bool {
    true
}

impl NewPlant {
    pub fn new(name: impl Into<String>, price: impl Into<String>, categories: Vec<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            categories,
            in_stock: true,
            description: None,
        }
    }

    pub fn in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Update payload. Absent fields keep their stored value; an explicit
/// `"description": null` clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// `Some` for any present value, `null` included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl PlantPatch {
    pub fn is_empty(&self) -> bool {
        self == &PlantPatch::default()
    }

    /// Render as a `$set`-style document containing only the present fields.
    pub fn to_set_document(&self) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Serde(format!("patch rendered as {}", other))),
        }
    }
}

impl From<NewPlant> for PlantPatch {
    fn from(new: NewPlant) -> Self {
        Self {
            name: Some(new.name),
            price: Some(new.price),
            categories: Some(new.categories),
            in_stock: Some(new.in_stock),
            description: new.description.map(Some),
        }
    }
}

impl Plant {
    /// Build the stored document for a fresh insert, enforcing the schema.
    pub fn from_new(id: PlantId, new: NewPlant, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let mut plant = Plant {
            id,
            name: new.name,
            price: new.price,
            categories: new.categories,
            in_stock: new.in_stock,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        plant.normalize();
        plant.check_schema()?;
        Ok(plant)
    }

    /// Apply a `$set` document, re-run the schema and refresh `updatedAt`.
    pub fn apply_set(&self, set: &Map<String, Value>, now: DateTime<Utc>) -> Result<Self, StoreError> {
        let mut doc = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => return Err(StoreError::Serde(format!("plant rendered as {}", other))),
        };
        for (key, value) in set {
            if PROTECTED_KEYS.contains(&key.as_str()) {
                continue;
            }
            doc.insert(key.clone(), value.clone());
        }

        let mut updated: Plant =
            serde_json::from_value(Value::Object(doc)).map_err(|e| StoreError::Schema(e.to_string()))?;
        updated.normalize();
        updated.check_schema()?;
        updated.updated_at = now;
        Ok(updated)
    }

    fn normalize(&mut self) {
        let name = self.name.trim();
        if name.len() != self.name.len() {
            self.name = name.to_string();
        }
        let price = self.price.trim();
        if price.len() != self.price.len() {
            self.price = price.to_string();
        }
    }

    /// Collection schema: the shape every stored document must have.
    pub fn check_schema(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();

        if self.name.is_empty() {
            problems.push("name: Plant name is required".to_string());
        } else if self.name.chars().count() > NAME_MAX_CHARS {
            problems.push("name: Plant name cannot exceed 100 characters".to_string());
        }
        if self.price.is_empty() {
            problems.push("price: Plant price is required".to_string());
        }
        if self.categories.is_empty() {
            problems.push("categories: At least one category is required".to_string());
        }
        for (i, category) in self.categories.iter().enumerate() {
            if category.is_empty() {
                problems.push(format!("categories.{i}: Path `categories.{i}` is required."));
            }
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                problems.push("description: Description cannot exceed 500 characters".to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Schema(problems.join(", ")))
        }
    }
}

/// Current time at the millisecond precision timestamps are stored with.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// ISO-8601 with fixed millisecond precision, so stored timestamps sort as text.
mod timestamp {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

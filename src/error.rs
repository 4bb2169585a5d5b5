use std::error::Error;
use std::fmt;

use serde::Serialize;

/// Failure reported by a plant store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The supplied identifier could not be cast to a `PlantId`.
    InvalidId(String),
    /// The document violates the collection schema.
    Schema(String),
    /// The query parameters could not be turned into a store query.
    InvalidQuery(String),
    /// Document (de)serialization failed.
    Serde(String),
    /// Backend I/O or engine failure.
    Storage(String),
    LockPoisoned(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidId(raw) => write!(
                f,
                "Cast to ObjectId failed for value \"{}\" (type string) at path \"_id\" for model \"Plant\"",
                raw
            ),
            StoreError::Schema(message) => write!(f, "Plant validation failed: {}", message),
            StoreError::InvalidQuery(message) => write!(f, "invalid query: {}", message),
            StoreError::Serde(message) => write!(f, "document serialization error: {}", message),
            StoreError::Storage(message) => write!(f, "storage error: {}", message),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
        }
    }
}

impl Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// One failed precondition on a request body field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    pub msg: String,
    pub path: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn body(path: impl Into<String>, value: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self {
            kind: "field",
            value,
            msg: msg.into(),
            path: path.into(),
            location: "body",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.msg)
    }
}

/// Error type for catalog operations, one variant per response class.
#[derive(Debug)]
pub enum CatalogError {
    /// Request payload failed the precondition checks.
    Validation(Vec<FieldError>),
    /// No plant with the given id.
    NotFound(String),
    /// Anything the store reported, including malformed ids.
    Store(StoreError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Validation(errors) => {
                write!(f, "validation error")?;
                for (i, err) in errors.iter().enumerate() {
                    let sep = if i == 0 { ": " } else { "; " };
                    write!(f, "{}{}", sep, err)?;
                }
                Ok(())
            }
            CatalogError::NotFound(id) => write!(f, "plant not found: {}", id),
            CatalogError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CatalogError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Store(err)
    }
}

impl CatalogError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Validation(_) => 400,
            CatalogError::NotFound(_) => 404,
            CatalogError::Store(_) => 500,
        }
    }
}

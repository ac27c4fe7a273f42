//! Item payloads: validated name, creation input and partial-update patch
//!
//! Request bodies are parsed in two steps. The raw JSON is first read into
//! `ItemFields`, which records for every known key whether it was present
//! and what it held (including an explicit `null`). The typed payloads are
//! then built from those fields, so each field gets its own error message.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::ValidationError;

/// Validated item name (non-empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemName(String);

impl ItemName {
    /// Create a new item name.
    ///
    /// # Example
    /// ```
    /// use itemctl_server::models::ItemName;
    ///
    /// assert!(ItemName::new("Widget").is_ok());
    /// assert!(ItemName::new("").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "Name" });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Known keys of an item body. Outer `None` means the key was absent.
#[derive(Debug, Default, Deserialize)]
struct ItemFields {
    #[serde(default, deserialize_with = "present")]
    name: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    price: Option<Value>,
}

/// Keeps `null` as `Some(Value::Null)` instead of collapsing it into "absent".
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ItemFields {
    /// Parse a request body. An empty body yields no fields.
    fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|_| ValidationError::MalformedBody)?;
        if !value.is_object() {
            return Err(ValidationError::NotAnObject);
        }

        serde_json::from_value(value).map_err(|_| ValidationError::MalformedBody)
    }
}

fn description_value(value: Value) -> Result<Option<String>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(ValidationError::InvalidType {
            field: "Description",
            expected: "a string or null",
        }),
    }
}

fn price_value(value: &Value) -> Result<f64, ValidationError> {
    value.as_f64().ok_or(ValidationError::InvalidType {
        field: "Price",
        expected: "a number",
    })
}

/// Input for creating an item, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: ItemName,
    pub description: Option<String>,
    pub price: f64,
}

impl NewItem {
    /// Build from a raw request body.
    ///
    /// A missing, unparsable or non-object body, and a `name` that is absent,
    /// null, empty or not a string, all fail with "Name is required".
    /// `description` defaults to `""` and `price` to `0.0`.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let name_required = ValidationError::Required { field: "Name" };
        let fields = ItemFields::parse(body).map_err(|_| name_required.clone())?;

        let name = match fields.name {
            Some(Value::String(s)) if !s.is_empty() => ItemName(s),
            _ => return Err(name_required),
        };

        let description = match fields.description {
            None => Some(String::new()),
            Some(value) => description_value(value)?,
        };

        let price = match fields.price {
            None | Some(Value::Null) => 0.0,
            Some(value) => price_value(&value)?,
        };

        Ok(Self {
            name,
            description,
            price,
        })
    }
}

/// Partial update. `None` leaves the stored field untouched.
///
/// `description` is nullable, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<ItemName>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
}

impl ItemPatch {
    /// Build from a raw request body. An empty body is an empty patch.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationError> {
        let fields = ItemFields::parse(body)?;

        let name = match fields.name {
            None => None,
            Some(Value::String(s)) => Some(ItemName::new(&s)?),
            Some(Value::Null) => return Err(ValidationError::Empty { field: "Name" }),
            Some(_) => {
                return Err(ValidationError::InvalidType {
                    field: "Name",
                    expected: "a string",
                })
            }
        };

        let description = fields.description.map(description_value).transpose()?;
        let price = fields.price.as_ref().map(price_value).transpose()?;

        Ok(Self {
            name,
            description,
            price,
        })
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

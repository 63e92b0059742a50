use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;

/// A named beer. The name is the identity; there is no surrogate key.
///
/// Only `name` is typed. Every other field (`style`, `abv`, ...) is kept
/// verbatim in `fields`, so a record written over the wire comes back with
/// exactly the same JSON, nulls and integer/float spelling included.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Beer {
    pub name: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Beer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Map::new() }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_style(self, style: impl Into<String>) -> Self {
        let style: String = style.into();
        self.with_field("style", style)
    }

    /// Alcohol by volume, in percent.
    pub fn with_abv(self, abv: f64) -> Self {
        self.with_field("abv", abv)
    }

    /// `style` when it is present and a string.
    pub fn style(&self) -> Option<&str> {
        self.fields.get("style").and_then(Value::as_str)
    }

    /// `abv` when it is present and numeric.
    pub fn abv(&self) -> Option<f64> {
        self.fields.get("abv").and_then(Value::as_f64)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name(&self.name)
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

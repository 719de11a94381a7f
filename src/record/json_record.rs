use super::{ExtractError, Record, TaggedField};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// A record read from JSON at runtime.
///
/// Only objects are struct-shaped. Every key is bound under every tag
/// family with its own name as the tag value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    pub name: String,
    pub value: Value,
}

impl JsonRecord {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        JsonRecord {
            name: name.into(),
            value,
        }
    }

    fn unsupported(&self) -> ExtractError {
        ExtractError::unsupported_kind_with_context(
            kind_of(&self.value),
            format!("record `{}`", self.name),
        )
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Record for JsonRecord {
    fn entity_name(&self) -> Result<Cow<'_, str>, ExtractError> {
        match self.value {
            Value::Object(_) => Ok(Cow::Borrowed(self.name.as_str())),
            _ => Err(self.unsupported()),
        }
    }

    fn tagged_fields(&self, _tag_name: &str) -> Result<Vec<TaggedField>, ExtractError> {
        let Value::Object(map) = &self.value else {
            return Err(self.unsupported());
        };

        Ok(map
            .iter()
            .map(|(key, value)| TaggedField {
                name: key.clone(),
                tag: key.clone(),
                value: Some(value.clone()),
            })
            .collect())
    }
}

//! Record extraction.
//!
//! Turns a tagged record into an [`EntityDescriptor`]: the record's entity
//! name plus the ordered list of fields bound under one tag family.
//!
//! Typed records implement [`Entity`] by exposing a static
//! [`EntitySchema`]; dynamic JSON records go through [`JsonRecord`]. Both
//! are consumed through the object-safe [`Record`] trait.

use serde_json::Value;
use std::borrow::Cow;

mod errors;
mod json_record;
pub mod schema;

pub use errors::ExtractError;
pub use json_record::JsonRecord;
pub use schema::{EntitySchema, EntitySchemaBuilder, FieldDescriptor};

/// Tag value that always excludes a field
pub const SKIP_TAG: &str = "-";

/// A record type with a static field table
pub trait Entity: Sized + 'static {
    fn schema() -> &'static EntitySchema<Self>;
}

/// A field carrying a tag of the requested family. `value` is `None` when
/// the field cannot be read.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedField {
    pub name: String,
    pub tag: String,
    pub value: Option<Value>,
}

pub trait Record {
    /// Name of the record's type, used as the default label
    fn entity_name(&self) -> Result<Cow<'_, str>, ExtractError>;

    /// Fields tagged under `tag_name`, in declaration order
    fn tagged_fields(&self, tag_name: &str) -> Result<Vec<TaggedField>, ExtractError>;
}

impl<T: Entity> Record for T {
    fn entity_name(&self) -> Result<Cow<'_, str>, ExtractError> {
        Ok(Cow::Borrowed(T::schema().name()))
    }

    fn tagged_fields(&self, tag_name: &str) -> Result<Vec<TaggedField>, ExtractError> {
        Ok(T::schema()
            .fields()
            .iter()
            .filter_map(|field| {
                field.tag(tag_name).map(|tag| TaggedField {
                    name: field.name().to_string(),
                    tag: tag.to_string(),
                    value: field.read(self),
                })
            })
            .collect())
    }
}

/// A readable, tagged field that survived extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    pub name: String,
    pub tag: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    pub entity_name: String,
    /// Fields bound into create and set fragments
    pub fields: Vec<ExtractedField>,
    /// Readable tagged fields left out by the exclude set. They can still
    /// back match-clause parameters.
    pub excluded: Vec<ExtractedField>,
}

impl EntityDescriptor {
    /// Value of the field whose tag equals `tag`, excluded fields included
    pub fn value_for_tag(&self, tag: &str) -> Option<&Value> {
        self.fields
            .iter()
            .chain(self.excluded.iter())
            .find(|field| field.tag == tag)
            .map(|field| &field.value)
    }
}

/// Extracts the fields of `record` bound under `tag_name`.
///
/// Fields with a blank tag, a `-` tag or no readable value are dropped.
/// Fields whose tag is in `excludes` are moved to `excluded`.
pub fn extract<R>(
    record: &R,
    tag_name: &str,
    excludes: &[&str],
) -> Result<EntityDescriptor, ExtractError>
where
    R: Record + ?Sized,
{
    let entity_name = record.entity_name()?.into_owned();
    let mut fields = Vec::new();
    let mut excluded = Vec::new();

    for tagged in record.tagged_fields(tag_name)? {
        if tagged.tag.trim().is_empty() {
            continue;
        }
        let Some(value) = tagged.value else {
            log::trace!(
                "skipping unreadable field `{}` on `{}`",
                tagged.name,
                entity_name
            );
            continue;
        };
        if tagged.tag == SKIP_TAG {
            continue;
        }

        let field = ExtractedField {
            name: tagged.name,
            tag: tagged.tag,
            value,
        };
        if excludes.contains(&field.tag.as_str()) {
            excluded.push(field);
        } else {
            fields.push(field);
        }
    }

    Ok(EntityDescriptor {
        entity_name,
        fields,
        excluded,
    })
}

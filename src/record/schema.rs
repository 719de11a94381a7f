//! Per-type field tables.
//!
//! An [`EntitySchema`] lists the fields of one record type in declaration
//! order. Each field carries the tags it is bound under (one value per tag
//! family, e.g. `json` or `custom`) and an accessor that reads the field's
//! value out of a record.
//!
//! ```ignore
//! lazy_static! {
//!     static ref USER_SCHEMA: EntitySchema<User> = EntitySchema::builder("User")
//!         .field("id", |u: &User| &u.id, &[("json", "id")])
//!         .field("name", |u: &User| &u.name, &[("json", "name")])
//!         .hidden_field("password_hash", &[("json", "password")])
//!         .build();
//! }
//!
//! impl Entity for User {
//!     fn schema() -> &'static EntitySchema<Self> {
//!         &USER_SCHEMA
//!     }
//! }
//! ```

use serde::Serialize;
use serde_json::Value;
use std::fmt;

type Accessor<T> = Box<dyn Fn(&T) -> Result<Value, serde_json::Error> + Send + Sync>;

/// One declared field of a record type
pub struct FieldDescriptor<T> {
    name: &'static str,
    tags: Vec<(&'static str, &'static str)>,
    accessor: Option<Accessor<T>>,
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tag value for the given tag family, if the field carries one
    pub fn tag(&self, tag_name: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(family, _)| *family == tag_name)
            .map(|(_, value)| *value)
    }

    /// Reads the field's value. `None` means the field cannot be read,
    /// either because it has no accessor or because serialization failed.
    pub fn read(&self, record: &T) -> Option<Value> {
        let accessor = self.accessor.as_ref()?;
        match accessor(record) {
            Ok(value) => Some(value),
            Err(e) => {
                log::trace!("field `{}` is unreadable: {}", self.name, e);
                None
            }
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tags", &self.tags)
            .field("readable", &self.accessor.is_some())
            .finish()
    }
}

/// Ordered field table for a record type
#[derive(Debug)]
pub struct EntitySchema<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T> EntitySchema<T> {
    pub fn builder(name: &'static str) -> EntitySchemaBuilder<T> {
        EntitySchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }
}

pub struct EntitySchemaBuilder<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> EntitySchemaBuilder<T> {
    /// Declare a readable field
    pub fn field<F, V>(
        mut self,
        name: &'static str,
        accessor: F,
        tags: &[(&'static str, &'static str)],
    ) -> Self
    where
        F: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
        V: Serialize + ?Sized,
    {
        self.fields.push(FieldDescriptor {
            name,
            tags: tags.to_vec(),
            accessor: Some(Box::new(move |record: &T| {
                serde_json::to_value(accessor(record))
            })),
        });
        self
    }

    /// Declare a field that is never read, even when tagged
    pub fn hidden_field(mut self, name: &'static str, tags: &[(&'static str, &'static str)]) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            tags: tags.to_vec(),
            accessor: None,
        });
        self
    }

    pub fn build(self) -> EntitySchema<T> {
        EntitySchema {
            name: self.name,
            fields: self.fields,
        }
    }
}

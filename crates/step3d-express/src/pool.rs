//! The instance pool: every entity instance of one exchange file.

use std::collections::HashMap;

use thiserror::Error;

use crate::schema;
use crate::value::{InstanceId, Value};

/// One `NAME(params)` record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub type_name: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceBody {
    /// `#1=PRODUCT(...);`
    Simple(Record),
    /// `#1=(REPRESENTATION_CONTEXT(...) GEOMETRIC_REPRESENTATION_CONTEXT(3));`
    Complex(Vec<Record>),
}

/// A typed entity instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub id: InstanceId,
    pub body: InstanceBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("#{id} is a complex instance, attribute '{attribute}' is not addressable by name")]
    Complex { id: InstanceId, attribute: String },
    #[error("#{id}: entity {type_name} has no attribute '{attribute}'")]
    Unknown {
        id: InstanceId,
        type_name: String,
        attribute: String,
    },
    #[error("#{id}: attribute '{attribute}' of {type_name} is missing (record has {count} parameters)")]
    Missing {
        id: InstanceId,
        type_name: String,
        attribute: String,
        count: usize,
    },
}

impl Instance {
    pub fn simple(id: InstanceId, type_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id,
            body: InstanceBody::Simple(Record {
                type_name: type_name.into(),
                params,
            }),
        }
    }

    /// Declared entity type. Complex instances have none.
    pub fn type_name(&self) -> Option<&str> {
        match &self.body {
            InstanceBody::Simple(record) => Some(&record.type_name),
            InstanceBody::Complex(_) => None,
        }
    }

    pub fn params(&self) -> &[Value] {
        match &self.body {
            InstanceBody::Simple(record) => &record.params,
            InstanceBody::Complex(_) => &[],
        }
    }

    /// Named attribute access through the schema attribute table.
    pub fn attribute(&self, attribute: &str) -> Result<&Value, AttributeError> {
        let record = match &self.body {
            InstanceBody::Simple(record) => record,
            InstanceBody::Complex(_) => {
                return Err(AttributeError::Complex {
                    id: self.id,
                    attribute: attribute.to_string(),
                })
            }
        };

        let index = schema::attribute_index(&record.type_name, attribute).ok_or_else(|| {
            AttributeError::Unknown {
                id: self.id,
                type_name: record.type_name.clone(),
                attribute: attribute.to_string(),
            }
        })?;

        record.params.get(index).ok_or_else(|| AttributeError::Missing {
            id: self.id,
            type_name: record.type_name.clone(),
            attribute: attribute.to_string(),
            count: record.params.len(),
        })
    }

    /// Convenience for string-valued attributes in raw exchange notation.
    pub fn raw_attribute(&self, attribute: &str) -> Result<String, AttributeError> {
        Ok(self.attribute(attribute)?.to_raw_string())
    }
}

/// Header and data instances of one file, in file order.
#[derive(Debug, Clone, Default)]
pub struct InstancePool {
    header: Vec<Instance>,
    instances: Vec<Instance>,
    by_id: HashMap<InstanceId, usize>,
}

impl InstancePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_header(&mut self, type_name: impl Into<String>, params: Vec<Value>) {
        let id = self.header.len() as InstanceId + 1;
        self.header.push(Instance::simple(id, type_name, params));
    }

    /// Add a data instance. Returns the rejected instance when its id is taken.
    pub fn insert(&mut self, instance: Instance) -> Result<(), Instance> {
        if self.by_id.contains_key(&instance.id) {
            return Err(instance);
        }
        self.by_id.insert(instance.id, self.instances.len());
        self.instances.push(instance);
        Ok(())
    }

    pub fn header_instances(&self) -> &[Instance] {
        &self.header
    }

    /// Data instances in file order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.by_id.get(&id).map(|&i| &self.instances[i])
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Follow a reference value one hop. Non-references and dangling ids give `None`.
    pub fn resolve(&self, value: &Value) -> Option<&Instance> {
        self.get(value.as_ref_id()?)
    }
}

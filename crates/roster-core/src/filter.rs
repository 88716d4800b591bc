//! Record filters
//!
//! A filter is either "field equals value" or "list field contains value".

use crate::record::{FieldRef, Record};
use crate::{Result, RosterError};
use uuid::Uuid;

/// Literal a filter compares against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    Int(i64),
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::Uuid(id)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter<F> {
    Equals { field: F, value: Value },
    Contains { field: F, value: Value },
}

impl<F: Copy + std::fmt::Debug> Filter<F> {
    pub fn equals(field: F, value: impl Into<Value>) -> Self {
        Filter::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn contains(field: F, value: impl Into<Value>) -> Self {
        Filter::Contains {
            field,
            value: value.into(),
        }
    }

    /// Test a record against this filter.
    ///
    /// Fails with `InvalidFilter` when the field's shape does not fit the
    /// filter kind, e.g. `Contains` on a scalar field.
    pub fn matches<R>(&self, record: &R) -> Result<bool>
    where
        R: Record<Field = F>,
    {
        match self {
            Filter::Equals { field, value } => match (record.field(*field), value) {
                (FieldRef::Uuid(actual), Value::Uuid(expected)) => Ok(actual == *expected),
                (FieldRef::Text(actual), Value::Text(expected)) => Ok(actual == expected.as_str()),
                (FieldRef::Int(actual), Value::Int(expected)) => Ok(actual == *expected),
                (actual, _) => Err(mismatch::<R>("equals", field, actual, value)),
            },
            Filter::Contains { field, value } => match (record.field(*field), value) {
                (FieldRef::UuidList(ids), Value::Uuid(expected)) => Ok(ids.contains(expected)),
                (actual, _) => Err(mismatch::<R>("contains", field, actual, value)),
            },
        }
    }
}

fn mismatch<R: Record>(
    kind: &str,
    field: &R::Field,
    actual: FieldRef<'_>,
    value: &Value,
) -> RosterError {
    RosterError::InvalidFilter(format!(
        "{}.{:?} cannot be tested with {} {:?} (field is {:?})",
        R::COLLECTION,
        field,
        kind,
        value,
        actual
    ))
}

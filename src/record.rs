//! Normalized record shape shared by every envelope, and the fixed four-column output row.

use std::collections::BTreeMap;
use std::fmt;

/// A decoded scalar attribute. Numbers keep the exact text they were exported with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(String),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => f.write_str(n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// Field name -> scalar value. Non-scalar attributes are not retained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, Scalar>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Scalar) {
        self.fields.insert(field.into(), value);
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, Scalar::String(value.into()));
        self
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.fields.get(field)
    }

    /// Display text of a field; `None` when absent or null.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Scalar::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// True when the field is a string or number whose text equals `expected`.
    pub fn text_eq(&self, field: &str, expected: &str) -> bool {
        match self.fields.get(field) {
            Some(Scalar::String(s)) | Some(Scalar::Number(s)) => s == expected,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Column order of the output table.
pub const OUTPUT_HEADER: [&str; 4] = ["PK", "SK", "country", "userId"];

/// One row of the output table. All four fields are always populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    pub pk: String,
    pub sk: String,
    pub country: String,
    pub user_id: String,
}

impl OutputRow {
    pub fn fields(&self) -> [&str; 4] {
        [&self.pk, &self.sk, &self.country, &self.user_id]
    }
}

//! Coverage report model.
//!
//! A report is a JSON array of records, each naming a module and carrying its
//! measured `lineCoverage`. Records are kept in document order alongside the
//! raw document so a failed lookup can echo the whole input back.

use std::io::Read;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::LookupError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoverageRecord {
    pub name: String,
    /// `None` when the key is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(rename = "lineCoverage", default, deserialize_with = "present")]
    pub line_coverage: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone)]
pub struct CoverageReport {
    document: Value,
    records: Vec<CoverageRecord>,
}

impl CoverageReport {
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let document: Value = serde_json::from_str(input)?;
        Self::from_document(document)
    }

    /// Reads the reader to the end before parsing anything.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, LookupError> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        debug!(bytes = buf.len(), "read coverage report");
        Self::parse(&buf)
    }

    pub fn from_document(document: Value) -> Result<Self, LookupError> {
        let items = document.as_array().ok_or_else(|| {
            LookupError::MalformedInput(format!(
                "expected a JSON array of records, found {}",
                kind_of(&document)
            ))
        })?;

        let mut records = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(LookupError::MalformedInput(format!(
                    "record {idx} is {}, expected an object",
                    kind_of(item)
                )));
            }
            let record = CoverageRecord::deserialize(item)
                .map_err(|e| LookupError::MalformedInput(format!("record {idx}: {e}")))?;
            records.push(record);
        }
        debug!(records = records.len(), "parsed coverage report");

        Ok(Self { document, records })
    }

    pub fn records(&self) -> &[CoverageRecord] {
        &self.records
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// First record in document order whose name equals `module` exactly.
    pub fn find(&self, module: &str) -> Option<&CoverageRecord> {
        self.records.iter().find(|r| r.name == module)
    }

    pub fn lookup(&self, module: &str) -> Result<&Value, LookupError> {
        let record = self.find(module).ok_or_else(|| LookupError::NotFound {
            module: module.to_string(),
            document: self.to_json(),
        })?;
        record
            .line_coverage
            .as_ref()
            .ok_or_else(|| LookupError::MissingCoverage {
                module: module.to_string(),
            })
    }

    /// Compact re-serialization of the whole input document, keys in input order.
    pub fn to_json(&self) -> String {
        self.document.to_string()
    }
}

/// Text printed for a coverage value.
///
/// Strings lose their quotes. Numbers print exactly as written in the report
/// (`42`, `87.5`, `18446744073709551616`). Everything else prints as compact JSON.
pub fn format_coverage(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

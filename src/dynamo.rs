//! DynamoDB-JSON export lines: `{"Item": {"attr": {"S": "..."}, ...}}`, one item per line.

use crate::error::DecodeError;
use crate::record::{Record, Scalar};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Typed attribute as written by the DynamoDB export (single type descriptor per value).
#[derive(Debug, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    B(String),
    #[serde(rename = "BOOL")]
    Bool(bool),
    #[serde(rename = "NULL")]
    Null(bool),
    M(BTreeMap<String, AttributeValue>),
    L(Vec<AttributeValue>),
    SS(Vec<String>),
    NS(Vec<String>),
    BS(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ItemLine {
    #[serde(rename = "Item")]
    item: BTreeMap<String, AttributeValue>,
}

fn is_number_text(s: &str) -> bool {
    !s.trim().is_empty() && s.trim().parse::<f64>().is_ok()
}

/// Unmarshal a decoded item into a flat record. Nested maps/lists/sets are validated
/// but not kept.
pub fn unmarshal(item: BTreeMap<String, AttributeValue>) -> Result<Record, DecodeError> {
    let mut rec = Record::new();
    for (field, value) in item {
        let scalar = match value {
            AttributeValue::S(s) | AttributeValue::B(s) => Scalar::String(s),
            AttributeValue::N(n) => {
                if !is_number_text(&n) {
                    return Err(DecodeError::Attribute { field, reason: format!("`{}` is not a number", n) });
                }
                Scalar::Number(n)
            }
            AttributeValue::Bool(b) => Scalar::Bool(b),
            AttributeValue::Null(_) => Scalar::Null,
            AttributeValue::NS(ns) => {
                if let Some(bad) = ns.iter().find(|n| !is_number_text(n)) {
                    return Err(DecodeError::Attribute { field, reason: format!("`{}` is not a number", bad) });
                }
                continue;
            }
            AttributeValue::M(_) | AttributeValue::L(_) | AttributeValue::SS(_) | AttributeValue::BS(_) => continue,
        };
        rec.insert(field, scalar);
    }
    Ok(rec)
}

/// Decode one self-contained export line. Whitespace-only lines yield `Ok(None)`.
pub fn decode_item_line(line: &str) -> Result<Option<Record>, DecodeError> {
    if line.trim().is_empty() {
        return Ok(None);
    }
    let parsed: ItemLine = serde_json::from_str(line)?;
    unmarshal(parsed.item).map(Some)
}

//! Record framing on top of the two export encodings.
//!
//! `DynamoJson` lines are self-contained. `Ion` lines carry wrapper values where the
//! presence of a non-empty `Item` marks the start of the next record; `LineDecoder`
//! keeps the record being built until the next payload (or end of input) closes it.

use crate::dynamo::decode_item_line;
use crate::error::DecodeError;
use crate::ion::{parse_values, IonValue};
use crate::record::Record;
use std::mem;
use std::path::Path;

/// Encoding of the lines in one export file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Envelope {
    /// `{"Item": {...}}` with DynamoDB type descriptors, one record per line.
    DynamoJson,
    /// Ion text wrappers; records are delimited by payload presence.
    Ion,
}

impl Envelope {
    /// `*.ion`, `*.ion.gz`, `*.ion.zst` are Ion; anything else is DynamoDB JSON.
    pub fn from_path(path: &Path) -> Self {
        let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default().to_ascii_lowercase();
        let stem = name.trim_end_matches(".gz").trim_end_matches(".zst");
        if stem.ends_with(".ion") {
            Envelope::Ion
        } else {
            Envelope::DynamoJson
        }
    }
}

#[derive(Debug)]
enum State {
    Idle,
    Accumulating(Record),
}

/// Turns lines into records, holding at most one in-progress record.
#[derive(Debug)]
pub struct LineDecoder {
    envelope: Envelope,
    state: State,
}

impl LineDecoder {
    pub fn new(envelope: Envelope) -> Self {
        Self { envelope, state: State::Idle }
    }

    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating(_))
    }

    /// Decode one line and return the records it completes, in input order.
    /// A line that fails to decode leaves the decoder state unchanged.
    pub fn push_line(&mut self, line: &str) -> Result<Vec<Record>, DecodeError> {
        if line.trim().is_empty() {
            return Ok(Vec::new());
        }
        match self.envelope {
            Envelope::DynamoJson => Ok(decode_item_line(line)?.into_iter().collect()),
            Envelope::Ion => {
                let values = parse_values(line)?;
                Ok(values.iter().filter_map(|v| self.push_wrapper(v)).collect())
            }
        }
    }

    /// Feed one wrapper value. Returns the previous record when this wrapper opens a new one.
    pub fn push_wrapper(&mut self, wrapper: &IonValue) -> Option<Record> {
        let payload = wrapper_payload(wrapper)?;
        match mem::replace(&mut self.state, State::Accumulating(payload)) {
            State::Idle => None,
            State::Accumulating(prev) => Some(prev),
        }
    }

    /// Flush the in-progress record at end of input.
    pub fn finish(&mut self) -> Option<Record> {
        match mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::Accumulating(rec) => Some(rec),
        }
    }
}

fn wrapper_payload(wrapper: &IonValue) -> Option<Record> {
    let item = wrapper.field("Item")?;
    match item {
        IonValue::Struct(fields) if !fields.is_empty() => item.to_record(),
        _ => None,
    }
}

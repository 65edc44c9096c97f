//! Decode-back validation of generated files.
//!
//! The encoder is hand-rolled, so every conversion is re-read with
//! `fitparser` before it is handed to the user: a successful decode proves
//! the framing and trailing CRC are intact, and the decoded records double as
//! the summary shown in the result view.

use std::fmt;
use std::io::Cursor;

use fitparser::{FitDataRecord, from_reader};

#[derive(Debug)]
pub enum FitInspectError {
    DecodeError(String),
}

impl fmt::Display for FitInspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitInspectError::DecodeError(msg) => {
                write!(f, "Generated FIT bytes failed to decode: {msg}")
            }
        }
    }
}

impl std::error::Error for FitInspectError {}

/// Simplified representation of a decoded FIT field for the result view.
#[derive(Debug, Clone)]
pub struct DisplayField {
    pub name: String,
    pub value: String,
}

/// Human-readable wrapper around one decoded data message.
#[derive(Debug, Clone)]
pub struct DisplayRecord {
    pub message_type: String,
    pub fields: Vec<DisplayField>,
}

/// Decode a generated FIT payload into display records, validating CRCs
/// along the way.
pub fn decode_fit(bytes: &[u8]) -> Result<Vec<DisplayRecord>, FitInspectError> {
    let mut cursor = Cursor::new(bytes);
    let records = from_reader(&mut cursor)
        .map_err(|err| FitInspectError::DecodeError(err.to_string()))?;
    Ok(to_display_records(&records))
}

fn to_display_records(records: &[FitDataRecord]) -> Vec<DisplayRecord> {
    records
        .iter()
        .map(|record| DisplayRecord {
            message_type: format!("{:?}", record.kind()),
            fields: record
                .fields()
                .iter()
                .map(|field| DisplayField {
                    name: field.name().to_string(),
                    value: field.to_string(),
                })
                .collect(),
        })
        .collect()
}

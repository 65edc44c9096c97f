//! Definition/data message framing.
//!
//! Every logical record is written as a definition message (schema: global
//! type, field numbers, sizes, base types) immediately followed by one data
//! message carrying the raw values in the same field order. Re-emitting the
//! definition ahead of each data message is redundant but protocol-legal,
//! and the reference files are laid out this way, so it is kept.

use crate::encoding::types::FitEncodeError;

pub const GLOBAL_FILE_ID: u16 = 0;
pub const GLOBAL_WORKOUT: u16 = 26;
pub const GLOBAL_WORKOUT_STEP: u16 = 27;

/// Fixed on-wire width of every text field, including NUL padding.
pub const TEXT_FIELD_LEN: usize = 16;

/// A typed field value. The variant decides the byte size and base-type code
/// written into the definition half.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Enum(u8),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    /// Raw text bytes, already truncated and NUL-padded by [`text_field`].
    Text(Vec<u8>),
}

impl FieldValue {
    fn wire_size(&self) -> Result<u8, FitEncodeError> {
        match self {
            FieldValue::Enum(_) | FieldValue::Uint8(_) => Ok(1),
            FieldValue::Uint16(_) => Ok(2),
            FieldValue::Uint32(_) => Ok(4),
            FieldValue::Text(bytes) => u8::try_from(bytes.len()).map_err(|_| {
                FitEncodeError::UnsupportedFieldType(format!(
                    "text field of {} bytes exceeds the one-byte size descriptor",
                    bytes.len()
                ))
            }),
        }
    }

    fn base_type(&self) -> u8 {
        match self {
            FieldValue::Enum(_) => 0,
            FieldValue::Uint8(_) => 2,
            FieldValue::Uint16(_) => 132,
            FieldValue::Uint32(_) => 134,
            FieldValue::Text(_) => 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub number: u8,
    pub value: FieldValue,
}

impl Field {
    pub fn new(number: u8, value: FieldValue) -> Self {
        Self { number, value }
    }
}

/// One logical message queued for serialization.
#[derive(Debug, Clone)]
pub struct Message {
    pub global_type: u16,
    pub fields: Vec<Field>,
}

impl Message {
    /// Append the definition/data pair for this message under the given local
    /// type alias.
    pub fn encode_into(&self, out: &mut Vec<u8>, local_type: u8) -> Result<(), FitEncodeError> {
        // Definition half: marker bit, reserved, little-endian architecture.
        out.push(0x40 | local_type);
        out.push(0);
        out.push(0);
        out.extend_from_slice(&self.global_type.to_le_bytes());
        out.push(self.fields.len() as u8);
        for field in &self.fields {
            out.push(field.number);
            out.push(field.value.wire_size()?);
            out.push(field.value.base_type());
        }

        // Data half: same local type, values in definition order.
        out.push(local_type);
        for field in &self.fields {
            match &field.value {
                FieldValue::Enum(value) | FieldValue::Uint8(value) => out.push(*value),
                FieldValue::Uint16(value) => out.extend_from_slice(&value.to_le_bytes()),
                FieldValue::Uint32(value) => out.extend_from_slice(&value.to_le_bytes()),
                FieldValue::Text(bytes) => out.extend_from_slice(bytes),
            }
        }
        Ok(())
    }
}

/// Truncate text to at most 15 bytes of UTF-8 and NUL-pad to exactly 16.
///
/// Truncation operates on encoded bytes, not code points, so a multi-byte
/// character straddling the limit is cut mid-sequence. That mirrors the
/// reference files byte for byte and is kept for compatibility, even though
/// it can leave an invalid UTF-8 tail in the name field.
pub fn text_field(value: &str) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.truncate(TEXT_FIELD_LEN - 1);
    bytes.resize(TEXT_FIELD_LEN, 0);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_pads_short_names() {
        let bytes = text_field("Warmup");
        assert_eq!(bytes.len(), TEXT_FIELD_LEN);
        assert_eq!(&bytes[..6], b"Warmup");
        assert!(bytes[6..].iter().all(|b| *b == 0));
    }

    #[test]
    fn text_field_truncates_to_fifteen_bytes() {
        let bytes = text_field("A very long workout name");
        assert_eq!(bytes.len(), TEXT_FIELD_LEN);
        assert_eq!(&bytes[..15], b"A very long wor");
        assert_eq!(bytes[15], 0);
    }

    #[test]
    fn text_field_is_idempotent_on_truncated_input() {
        let once = text_field("A very long workout name");
        let trimmed = String::from_utf8(once[..15].to_vec()).unwrap();
        let twice = text_field(&trimmed);
        assert_eq!(once, twice);
    }

    #[test]
    fn text_field_can_split_multibyte_sequences() {
        // Eight two-byte Cyrillic characters: byte 15 falls mid-character.
        let name = "ааааааа\u{0430}";
        assert_eq!(name.len(), 16);
        let bytes = text_field(name);
        assert_eq!(&bytes[..14], &name.as_bytes()[..14]);
        assert_eq!(bytes[14], name.as_bytes()[14]);
        assert_eq!(bytes[15], 0);
        assert!(std::str::from_utf8(&bytes[..15]).is_err());
    }

    #[test]
    fn definition_and_data_halves_share_field_order() {
        let message = Message {
            global_type: GLOBAL_FILE_ID,
            fields: vec![
                Field::new(0, FieldValue::Enum(4)),
                Field::new(1, FieldValue::Uint16(1)),
                Field::new(3, FieldValue::Uint32(0x0403_0201)),
            ],
        };
        let mut out = Vec::new();
        message.encode_into(&mut out, 2).unwrap();

        assert_eq!(
            out,
            vec![
                0x42, 0x00, 0x00, 0x00, 0x00, 3, // definition header
                0, 1, 0, // enum field descriptor
                1, 2, 132, // uint16 field descriptor
                3, 4, 134, // uint32 field descriptor
                0x02, // data header
                4, 1, 0, 0x01, 0x02, 0x03, 0x04,
            ]
        );
    }

    #[test]
    fn oversized_text_field_is_rejected() {
        let message = Message {
            global_type: GLOBAL_WORKOUT,
            fields: vec![Field::new(4, FieldValue::Text(vec![0u8; 300]))],
        };
        let mut out = Vec::new();
        let err = message.encode_into(&mut out, 0).unwrap_err();
        assert!(matches!(err, FitEncodeError::UnsupportedFieldType(_)));
    }
}

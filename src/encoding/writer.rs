//! File assembly: message queue, local type aliasing and header/checksum
//! framing.
//!
//! The assembler runs one linear pass: reserve a zeroed 14-byte header, write
//! every queued definition/data pair, backfill the real header with the body
//! size, then append the CRC over everything written so far. All state lives
//! in the writer instance, so one writer per encode keeps concurrent encodes
//! independent; reuse requires a fresh writer (or [`FitWriter::clear`]).

use std::collections::HashMap;

use crate::encoding::crc;
use crate::encoding::message::{
    Field, FieldValue, GLOBAL_FILE_ID, GLOBAL_WORKOUT, GLOBAL_WORKOUT_STEP, Message, text_field,
};
use crate::encoding::steps::{DURATION_TYPE_TIME, TARGET_TYPE_POWER, WorkoutStep};
use crate::encoding::types::{EncodedFit, FitEncodeError};

pub const HEADER_LEN: usize = 14;
const PROTOCOL_VERSION: u8 = 32;
const PROFILE_VERSION: u16 = 2105;

/// File type 4 identifies a workout file; manufacturer/product 1 marks a
/// development encoder, as the reference files do.
const FILE_TYPE_WORKOUT: u8 = 4;
const MANUFACTURER_DEVELOPMENT: u16 = 1;
const PRODUCT_ID: u16 = 1;

const SPORT_CYCLING: u8 = 0;
const TARGET_ZONE_CUSTOM: u32 = 0;

/// Assembles one FIT file from queued messages.
#[derive(Debug, Default)]
pub struct FitWriter {
    messages: Vec<Message>,
    local_types: HashMap<u16, u8>,
    next_local_type: u8,
}

impl FitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-file state so the writer can be reused for another encode.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.local_types.clear();
        self.next_local_type = 0;
    }

    /// Queue the file identity message. Must be first in any file.
    pub fn push_file_id(&mut self, created_at: u32) {
        self.messages.push(Message {
            global_type: GLOBAL_FILE_ID,
            fields: vec![
                Field::new(0, FieldValue::Enum(FILE_TYPE_WORKOUT)),
                Field::new(1, FieldValue::Uint16(MANUFACTURER_DEVELOPMENT)),
                Field::new(2, FieldValue::Uint16(PRODUCT_ID)),
                Field::new(3, FieldValue::Uint32(created_at)),
            ],
        });
    }

    /// Queue the workout summary message.
    pub fn push_workout(&mut self, name: &str, step_count: u16) {
        self.messages.push(Message {
            global_type: GLOBAL_WORKOUT,
            fields: vec![
                Field::new(4, FieldValue::Text(text_field(name))),
                Field::new(5, FieldValue::Enum(SPORT_CYCLING)),
                Field::new(6, FieldValue::Uint16(step_count)),
            ],
        });
    }

    /// Queue one workout step message.
    pub fn push_step(&mut self, step: &WorkoutStep) {
        self.messages.push(Message {
            global_type: GLOBAL_WORKOUT_STEP,
            fields: vec![
                Field::new(254, FieldValue::Uint16(step.index)),
                Field::new(0, FieldValue::Text(text_field(&step.name))),
                Field::new(1, FieldValue::Enum(DURATION_TYPE_TIME)),
                Field::new(2, FieldValue::Uint32(step.duration_ms)),
                Field::new(3, FieldValue::Enum(TARGET_TYPE_POWER)),
                Field::new(4, FieldValue::Uint32(TARGET_ZONE_CUSTOM)),
                Field::new(5, FieldValue::Uint32(step.target_low)),
                Field::new(6, FieldValue::Uint32(step.target_high)),
                Field::new(7, FieldValue::Enum(step.intensity)),
            ],
        });
    }

    /// First-seen local type assignment, starting at 0 and reused for every
    /// later message of the same global type.
    fn local_type_for(&mut self, global_type: u16) -> u8 {
        *self.local_types.entry(global_type).or_insert_with(|| {
            let assigned = self.next_local_type;
            self.next_local_type += 1;
            assigned
        })
    }

    /// Serialize the queued messages into a complete file image.
    pub fn finish(mut self) -> Result<EncodedFit, FitEncodeError> {
        if self.messages.is_empty() {
            return Err(FitEncodeError::NoSegments);
        }

        let mut buf = vec![0u8; HEADER_LEN];
        let data_start = buf.len();

        let queue = std::mem::take(&mut self.messages);
        for message in &queue {
            let local_type = self.local_type_for(message.global_type);
            message.encode_into(&mut buf, local_type)?;
        }
        let data_end = buf.len();

        let body_size = u32::try_from(data_end - data_start).map_err(|_| {
            FitEncodeError::InvalidInput("workout body exceeds the header size field".into())
        })?;
        write_header(&mut buf[..HEADER_LEN], body_size);

        let checksum = crc::checksum(&buf);
        buf.extend_from_slice(&checksum.to_le_bytes());

        let step_count = queue
            .iter()
            .filter(|message| message.global_type == GLOBAL_WORKOUT_STEP)
            .count() as u16;

        Ok(EncodedFit {
            bytes: buf,
            checksum,
            step_count,
        })
    }
}

fn write_header(header: &mut [u8], body_size: u32) {
    header[0] = HEADER_LEN as u8;
    header[1] = PROTOCOL_VERSION;
    header[2..4].copy_from_slice(&PROFILE_VERSION.to_le_bytes());
    header[4..8].copy_from_slice(&body_size.to_le_bytes());
    header[8..12].copy_from_slice(b".FIT");
    // Bytes 12..14 stay zero: the optional header checksum is unused.
    header[12..14].copy_from_slice(&0u16.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer_with_step(step_count: usize) -> FitWriter {
        let mut writer = FitWriter::new();
        writer.push_file_id(1_700_000_000);
        writer.push_workout("Test", step_count as u16);
        for index in 0..step_count {
            writer.push_step(&WorkoutStep {
                index: index as u16,
                name: format!("Step {}", index + 1),
                duration_ms: 60_000,
                target_low: 1100,
                target_high: 1150,
                intensity: 0,
            });
        }
        writer
    }

    #[test]
    fn empty_queue_is_rejected() {
        let err = FitWriter::new().finish().unwrap_err();
        assert!(matches!(err, FitEncodeError::NoSegments));
    }

    #[test]
    fn header_layout_matches_reference() {
        let encoded = writer_with_step(1).finish().unwrap();
        let header = &encoded.bytes[..HEADER_LEN];
        assert_eq!(header[0], 14);
        assert_eq!(header[1], 32);
        assert_eq!(u16::from_le_bytes([header[2], header[3]]), 2105);
        assert_eq!(&header[8..12], b".FIT");
        assert_eq!(&header[12..14], &[0, 0]);

        let body_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
        assert_eq!(encoded.bytes.len(), HEADER_LEN + body_size + 2);
    }

    #[test]
    fn local_types_are_assigned_first_seen_and_reused() {
        let encoded = writer_with_step(2).finish().unwrap();
        let bytes = &encoded.bytes;

        // file_id pair: 18-byte definition + 10-byte data.
        assert_eq!(bytes[14], 0x40);
        assert_eq!(bytes[32], 0x00);
        // workout pair: 15-byte definition + 20-byte data.
        assert_eq!(bytes[42], 0x41);
        assert_eq!(bytes[57], 0x01);
        // first step pair: 33-byte definition + 38-byte data.
        assert_eq!(bytes[77], 0x42);
        assert_eq!(bytes[110], 0x02);
        // second step re-emits the definition under the same local type.
        assert_eq!(bytes[148], 0x42);
        assert_eq!(bytes[181], 0x02);
    }

    #[test]
    fn trailing_checksum_covers_header_and_body() {
        let encoded = writer_with_step(1).finish().unwrap();
        let bytes = &encoded.bytes;
        let trailer = u16::from_le_bytes([bytes[bytes.len() - 2], bytes[bytes.len() - 1]]);
        assert_eq!(trailer, encoded.checksum);
        assert_eq!(crc::checksum(&bytes[..bytes.len() - 2]), trailer);
    }

    #[test]
    fn cleared_writer_restarts_local_types() {
        let mut writer = writer_with_step(1);
        writer.clear();
        writer.push_file_id(1_700_000_000);
        writer.push_workout("Second", 0);
        let encoded = writer.finish().unwrap();
        // file_id gets local type 0 again after the reset.
        assert_eq!(encoded.bytes[14], 0x40);
    }
}

pub mod crc;
pub mod message;
pub mod steps;
pub mod targets;
pub mod types;
pub mod writer;

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use self::steps::plan_step;
use self::writer::FitWriter;

pub use self::types::{
    DEFAULT_FTP_WATTS, EncodeOptions, EncodedFit, FitEncodeError, Workout, WorkoutSegment,
};

/// Encode a workout into a complete FIT file image.
///
/// The pass is linear: a file-identity message, one workout summary, then one
/// step per segment, each framed as a definition/data pair, finished with the
/// backfilled header and trailing checksum. Any failure aborts the whole
/// encode; there is no partial output to salvage.
pub fn encode_workout(
    workout: &Workout,
    options: &EncodeOptions,
) -> Result<EncodedFit, FitEncodeError> {
    if options.ftp_watts == 0 {
        return Err(FitEncodeError::InvalidInput(
            "FTP must be a positive number of watts".into(),
        ));
    }
    if workout.segments.is_empty() {
        return Err(FitEncodeError::NoSegments);
    }
    let step_count = u16::try_from(workout.segment_count()).map_err(|_| {
        FitEncodeError::InvalidInput(format!(
            "{} segments exceed the step count field",
            workout.segment_count()
        ))
    })?;

    let created_at = options.created_at.unwrap_or_else(unix_now);

    let mut fit_writer = FitWriter::new();
    fit_writer.push_file_id(created_at);
    fit_writer.push_workout(&workout.name, step_count);
    for (index, segment) in workout.segments.iter().enumerate() {
        let step = plan_step(segment, index, options.ftp_watts)?;
        fit_writer.push_step(&step);
    }

    let encoded = fit_writer.finish()?;
    tracing::debug!(
        name = %workout.name,
        steps = encoded.step_count,
        bytes = encoded.bytes.len(),
        checksum = %format!("{:04X}", encoded.checksum),
        "encoded workout"
    );
    Ok(encoded)
}

/// Encode a workout and persist it to `path`.
///
/// On failure the path may hold a partially written file; callers must only
/// trust the file when this returns `Ok`.
pub fn write_workout_file(
    workout: &Workout,
    options: &EncodeOptions,
    path: &Path,
) -> Result<EncodedFit, FitEncodeError> {
    let encoded = encode_workout(workout, options)?;
    std::fs::write(path, &encoded.bytes)
        .map_err(|err| FitEncodeError::IoFailure(format!("{}: {err}", path.display())))?;
    tracing::info!(path = %path.display(), checksum = %format!("{:04X}", encoded.checksum), "wrote FIT file");
    Ok(encoded)
}

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_workout() -> Workout {
        Workout {
            name: "Test Workout".into(),
            description: String::new(),
            segments: vec![
                WorkoutSegment::Warmup {
                    duration_seconds: 300,
                    power_start: 0.5,
                    power_end: 0.75,
                },
                WorkoutSegment::Steady {
                    duration_seconds: 600,
                    power: 0.8,
                },
                WorkoutSegment::Cooldown {
                    duration_seconds: 300,
                    power_start: 0.6,
                    power_end: 0.4,
                },
            ],
        }
    }

    fn fixed_options() -> EncodeOptions {
        EncodeOptions {
            ftp_watts: 250,
            created_at: Some(1_700_000_000),
        }
    }

    #[test]
    fn reference_workout_matches_known_image() {
        let encoded = encode_workout(&reference_workout(), &fixed_options()).unwrap();
        assert_eq!(encoded.bytes.len(), 292);
        assert_eq!(encoded.step_count, 3);
        assert_eq!(encoded.checksum, 0xBB46);
        assert_eq!(
            &encoded.bytes[..14],
            &[
                0x0E, 0x20, 0x39, 0x08, 0x14, 0x01, 0x00, 0x00, 0x2E, 0x46, 0x49, 0x54, 0x00,
                0x00
            ]
        );
    }

    #[test]
    fn encoding_is_deterministic_with_fixed_timestamp() {
        let first = encode_workout(&reference_workout(), &fixed_options()).unwrap();
        let second = encode_workout(&reference_workout(), &fixed_options()).unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.checksum, second.checksum);
    }

    #[test]
    fn empty_workout_is_rejected() {
        let workout = Workout {
            name: "Empty".into(),
            ..Workout::default()
        };
        assert!(matches!(
            encode_workout(&workout, &fixed_options()),
            Err(FitEncodeError::NoSegments)
        ));
    }

    #[test]
    fn zero_ftp_is_rejected_before_encoding() {
        let options = EncodeOptions {
            ftp_watts: 0,
            created_at: Some(0),
        };
        assert!(matches!(
            encode_workout(&reference_workout(), &options),
            Err(FitEncodeError::InvalidInput(_))
        ));
    }
}

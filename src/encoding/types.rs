use std::fmt;

/// Default FTP applied when the caller does not supply one, matching the
/// conversion surface's form default.
pub const DEFAULT_FTP_WATTS: u32 = 250;

/// One contiguous training interval extracted from a workout source.
///
/// Ramp segments (warmup/cooldown) carry a start/end power pair; steady and
/// interval segments carry a single power value. Power values are fractions
/// of the rider's FTP, so `0.75` means 75% of FTP. `FreeRide` has no power
/// target at all and is encoded with a fallback target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutSegment {
    Warmup {
        duration_seconds: u32,
        power_start: f64,
        power_end: f64,
    },
    Steady {
        duration_seconds: u32,
        power: f64,
    },
    Cooldown {
        duration_seconds: u32,
        power_start: f64,
        power_end: f64,
    },
    IntervalWork {
        duration_seconds: u32,
        power: f64,
    },
    IntervalRest {
        duration_seconds: u32,
        power: f64,
    },
    FreeRide {
        duration_seconds: u32,
    },
}

impl WorkoutSegment {
    pub fn duration_seconds(&self) -> u32 {
        match *self {
            WorkoutSegment::Warmup {
                duration_seconds, ..
            }
            | WorkoutSegment::Steady {
                duration_seconds, ..
            }
            | WorkoutSegment::Cooldown {
                duration_seconds, ..
            }
            | WorkoutSegment::IntervalWork {
                duration_seconds, ..
            }
            | WorkoutSegment::IntervalRest {
                duration_seconds, ..
            }
            | WorkoutSegment::FreeRide { duration_seconds } => duration_seconds,
        }
    }
}

/// A complete workout: ordered segments plus display metadata.
#[derive(Debug, Clone, Default)]
pub struct Workout {
    pub name: String,
    pub description: String,
    pub segments: Vec<WorkoutSegment>,
}

impl Workout {
    /// Total duration in seconds across all segments.
    pub fn total_duration(&self) -> u32 {
        self.segments
            .iter()
            .map(WorkoutSegment::duration_seconds)
            .sum()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Per-encode settings supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// Functional Threshold Power in watts. Must be positive.
    pub ftp_watts: u32,
    /// Creation timestamp (unix seconds) stamped into the file identity
    /// message. Defaults to the current time when `None`.
    pub created_at: Option<u32>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ftp_watts: DEFAULT_FTP_WATTS,
            created_at: None,
        }
    }
}

/// Result of a successful encode: the full file image plus the checksum that
/// was appended to it.
#[derive(Debug, Clone)]
pub struct EncodedFit {
    pub bytes: Vec<u8>,
    pub checksum: u16,
    pub step_count: u16,
}

#[derive(Debug)]
pub enum FitEncodeError {
    /// Caller-supplied input the encoder cannot work with (e.g. FTP of zero).
    InvalidInput(String),
    /// The workout contains no segments; there is nothing to encode.
    NoSegments,
    /// A field fell outside the fixed type table. The schema set is fixed, so
    /// reaching this means an encoder invariant was violated.
    UnsupportedFieldType(String),
    /// Writing the assembled file to storage failed.
    IoFailure(String),
}

impl fmt::Display for FitEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitEncodeError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            FitEncodeError::NoSegments => {
                write!(f, "No segments provided. Cannot encode an empty workout.")
            }
            FitEncodeError::UnsupportedFieldType(msg) => {
                write!(f, "Unsupported field type: {msg}")
            }
            FitEncodeError::IoFailure(msg) => write!(f, "Failed to write FIT file: {msg}"),
        }
    }
}

impl std::error::Error for FitEncodeError {}

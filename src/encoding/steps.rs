//! Segment-to-step mapping: derive the step name, intensity code, duration
//! and power targets that go into one workout-step message.

use crate::encoding::targets::power_targets;
use crate::encoding::types::{FitEncodeError, WorkoutSegment};

pub const DURATION_TYPE_TIME: u8 = 0;
pub const TARGET_TYPE_POWER: u8 = 4;

pub const INTENSITY_ACTIVE: u8 = 0;
pub const INTENSITY_REST: u8 = 1;
pub const INTENSITY_WARMUP: u8 = 2;
pub const INTENSITY_COOLDOWN: u8 = 3;

/// Fallback power fraction for steps without an explicit target.
const FALLBACK_POWER: f64 = 0.5;

/// One planned workout step, ready to be framed as a message.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutStep {
    pub index: u16,
    pub name: String,
    pub duration_ms: u32,
    pub target_low: u32,
    pub target_high: u32,
    pub intensity: u8,
}

/// Map one segment to its step. `index` is the zero-based step position.
///
/// Segments without a power target never abort the encode; they fall back to
/// a 50% FTP window, active intensity and an index-based name.
pub fn plan_step(
    segment: &WorkoutSegment,
    index: usize,
    ftp_watts: u32,
) -> Result<WorkoutStep, FitEncodeError> {
    let duration_ms = segment.duration_seconds().saturating_mul(1000);

    let (name, (target_low, target_high), intensity) = match *segment {
        WorkoutSegment::Warmup {
            power_start,
            power_end,
            ..
        } => (
            format!(
                "Warmup {:.0}-{:.0}%",
                power_start * 100.0,
                power_end * 100.0
            ),
            power_targets(power_start, power_end, ftp_watts)?,
            INTENSITY_WARMUP,
        ),
        WorkoutSegment::Cooldown {
            power_start,
            power_end,
            ..
        } => (
            format!(
                "Cooldown {:.0}-{:.0}%",
                power_start * 100.0,
                power_end * 100.0
            ),
            power_targets(power_start, power_end, ftp_watts)?,
            INTENSITY_COOLDOWN,
        ),
        WorkoutSegment::Steady { power, .. } => (
            format!("Steady {:.0}%", power * 100.0),
            power_targets(power, power, ftp_watts)?,
            INTENSITY_ACTIVE,
        ),
        WorkoutSegment::IntervalWork { power, .. } => (
            format!("Work {:.0}%", power * 100.0),
            power_targets(power, power, ftp_watts)?,
            INTENSITY_ACTIVE,
        ),
        WorkoutSegment::IntervalRest { power, .. } => (
            format!("Rest {:.0}%", power * 100.0),
            power_targets(power, power, ftp_watts)?,
            INTENSITY_REST,
        ),
        WorkoutSegment::FreeRide { .. } => (
            format!("Step {}", index + 1),
            power_targets(FALLBACK_POWER, FALLBACK_POWER, ftp_watts)?,
            INTENSITY_ACTIVE,
        ),
    };

    let index = u16::try_from(index).map_err(|_| {
        FitEncodeError::InvalidInput(format!("step index {index} exceeds the step message range"))
    })?;

    Ok(WorkoutStep {
        index,
        name,
        duration_ms,
        target_low,
        target_high,
        intensity,
    })
}

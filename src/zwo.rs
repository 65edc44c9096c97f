//! Zwift workout (.zwo) segment extraction.
//!
//! Only the step elements are interpreted: `Warmup`, `SteadyState`,
//! `Cooldown`, `IntervalsT` (expanded into individual work/rest segments) and
//! `FreeRide`. Everything else the dialect allows (text events, ramps inside
//! intervals, category metadata) is skipped.

use std::fmt;

use roxmltree::{Document, Node};

use crate::encoding::{Workout, WorkoutSegment};

#[derive(Debug)]
pub enum ZwoParseError {
    InvalidXml(String),
}

impl fmt::Display for ZwoParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZwoParseError::InvalidXml(msg) => write!(f, "Invalid ZWO file: {msg}"),
        }
    }
}

impl std::error::Error for ZwoParseError {}

/// Parse a ZWO document into a workout.
///
/// A missing `<workout>` element yields an empty segment list; the encoder
/// rejects that later, so callers get one consistent failure path.
pub fn parse_zwo(xml: &str) -> Result<Workout, ZwoParseError> {
    let doc = Document::parse(xml).map_err(|err| ZwoParseError::InvalidXml(err.to_string()))?;
    let root = doc.root_element();

    let name = child_text(root, "name").unwrap_or("Workout").to_string();
    let description = child_text(root, "description").unwrap_or("").to_string();

    let mut segments = Vec::new();
    if let Some(workout) = root.children().find(|node| node.has_tag_name("workout")) {
        for node in workout.children().filter(Node::is_element) {
            match node.tag_name().name() {
                "Warmup" => segments.push(WorkoutSegment::Warmup {
                    duration_seconds: attr_u32(node, "Duration", 0),
                    power_start: attr_f64(node, "PowerLow", 0.5),
                    power_end: attr_f64(node, "PowerHigh", 0.75),
                }),
                "SteadyState" => segments.push(WorkoutSegment::Steady {
                    duration_seconds: attr_u32(node, "Duration", 0),
                    power: attr_f64(node, "Power", 0.5),
                }),
                "Cooldown" => segments.push(WorkoutSegment::Cooldown {
                    duration_seconds: attr_u32(node, "Duration", 0),
                    power_start: attr_f64(node, "PowerLow", 0.5),
                    power_end: attr_f64(node, "PowerHigh", 0.45),
                }),
                "IntervalsT" => expand_intervals(node, &mut segments),
                "FreeRide" => segments.push(WorkoutSegment::FreeRide {
                    duration_seconds: attr_u32(node, "Duration", 0),
                }),
                other => {
                    tracing::debug!(element = other, "skipping unsupported ZWO element");
                }
            }
        }
    }

    Ok(Workout {
        name,
        description,
        segments,
    })
}

/// Expand an `IntervalsT` block into alternating work/rest segments. The rest
/// after the final repeat is dropped when `OffDuration` is zero.
fn expand_intervals(node: Node<'_, '_>, segments: &mut Vec<WorkoutSegment>) {
    let repeat = attr_u32(node, "Repeat", 1);
    let on_duration = attr_u32(node, "OnDuration", 60);
    let off_duration = attr_u32(node, "OffDuration", 60);
    let on_power = attr_f64(node, "OnPower", 0.9);
    let off_power = attr_f64(node, "OffPower", 0.5);

    for repetition in 0..repeat {
        segments.push(WorkoutSegment::IntervalWork {
            duration_seconds: on_duration,
            power: on_power,
        });
        if repetition + 1 < repeat || off_duration > 0 {
            segments.push(WorkoutSegment::IntervalRest {
                duration_seconds: off_duration,
                power: off_power,
            });
        }
    }
}

fn child_text<'a>(root: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    root.children()
        .find(|node| node.has_tag_name(tag))
        .and_then(|node| node.text())
        .filter(|text| !text.is_empty())
}

fn attr_u32(node: Node<'_, '_>, name: &str, default: u32) -> u32 {
    node.attribute(name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn attr_f64(node: Node<'_, '_>, name: &str, default: f64) -> f64 {
    node.attribute(name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

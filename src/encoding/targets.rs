//! Power fraction to FIT target-value conversion.
//!
//! The transform was reverse-engineered from a reference workout file created
//! at FTP 280: the format stores `1000 + ftp * fraction` as the midpoint of a
//! target window roughly 20% of the scaled power wide. Truncation toward zero
//! happens at each step, exactly as the reference encoding does.

use crate::encoding::types::FitEncodeError;

/// Compute the `(target_low, target_high)` pair for one step.
///
/// When `power_low` and `power_high` are equal the window is centered on a
/// single midpoint. When they differ (warmup/cooldown ramps) each endpoint is
/// derived from its own fraction independently; the results are NOT sorted,
/// so a descending ramp legitimately yields `target_low > target_high`.
pub fn power_targets(
    power_low: f64,
    power_high: f64,
    ftp_watts: u32,
) -> Result<(u32, u32), FitEncodeError> {
    if ftp_watts == 0 {
        return Err(FitEncodeError::InvalidInput(
            "FTP must be a positive number of watts".into(),
        ));
    }
    let ftp = f64::from(ftp_watts);

    if power_low == power_high {
        let midpoint = 1000.0 + ftp * power_low;
        let half_range = (0.2 * ftp * power_low / 2.0).trunc();
        Ok(((midpoint - half_range) as u32, (midpoint + half_range) as u32))
    } else {
        let low_midpoint = 1000.0 + ftp * power_low;
        let low_half_range = (0.2 * ftp * power_low / 2.0).trunc();
        let high_midpoint = 1000.0 + ftp * power_high;
        let high_half_range = (0.2 * ftp * power_high / 2.0).trunc();
        Ok((
            (low_midpoint - low_half_range) as u32,
            (high_midpoint + high_half_range) as u32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_single_values() {
        assert_eq!(power_targets(0.5, 0.5, 280).unwrap(), (1126, 1154));
        assert_eq!(power_targets(0.75, 0.75, 280).unwrap(), (1189, 1231));
        assert_eq!(power_targets(0.8, 0.8, 250).unwrap(), (1180, 1220));
    }

    #[test]
    fn reference_ranges_use_independent_endpoints() {
        assert_eq!(power_targets(0.5, 0.75, 280).unwrap(), (1126, 1231));
        assert_eq!(power_targets(0.5, 0.75, 250).unwrap(), (1113, 1205));
        // A descending ramp keeps its endpoint order.
        assert_eq!(power_targets(0.6, 0.4, 250).unwrap(), (1135, 1110));
    }

    #[test]
    fn single_value_window_is_ordered() {
        for ftp in [100u32, 250, 280, 400] {
            for tenths in 0..=20 {
                let fraction = f64::from(tenths) / 10.0;
                let (low, high) = power_targets(fraction, fraction, ftp).unwrap();
                assert!(low <= high, "ftp={ftp} fraction={fraction}");
            }
        }
    }

    #[test]
    fn zero_ftp_is_rejected() {
        assert!(matches!(
            power_targets(0.5, 0.5, 0),
            Err(FitEncodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn negative_fractions_are_not_domain_checked() {
        // Negative power fractions flow through the arithmetic; the negative
        // half-range inverts the window instead of erroring.
        assert_eq!(power_targets(-0.5, -0.5, 250).unwrap(), (887, 863));
    }
}

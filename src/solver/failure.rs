//! Lightbulb brightness and overload classification.

use serde::Serialize;

/// Power at which a lightbulb reaches full brightness, in watts.
///
/// A display scale, not a physical rating.
pub const FULL_BRIGHTNESS_POWER: f64 = 5.0;

/// A lightbulb dissipating more than this many watts is on fire.
pub const MAX_SAFE_POWER: f64 = 10.0;

/// A lightbulb carrying more than this many amps (either direction) is on fire.
pub const MAX_SAFE_CURRENT: f64 = 0.5;

/// Solved state of one lightbulb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulbReading {
    /// Signed current from terminal `a` to terminal `b`, in amps
    pub current: f64,
    /// Dissipated power, in watts
    pub power: f64,
    /// Display intensity in [0, 1]
    pub brightness: f64,
    /// Overloaded
    pub on_fire: bool,
}

impl BulbReading {
    /// Classify a lightbulb from its solved current and power.
    ///
    /// The thresholds are fixed and independent of the bulb's resistance.
    pub fn classify(current: f64, power: f64) -> Self {
        Self {
            current,
            power,
            brightness: brightness(power),
            on_fire: on_fire(current, power),
        }
    }
}

/// Normalized brightness for a dissipated power.
pub fn brightness(power: f64) -> f64 {
    (power / FULL_BRIGHTNESS_POWER).clamp(0.0, 1.0)
}

/// Overload test: strictly above either threshold.
pub fn on_fire(current: f64, power: f64) -> bool {
    power > MAX_SAFE_POWER || current.abs() > MAX_SAFE_CURRENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_brightness_scale() {
        assert_relative_eq!(brightness(0.0), 0.0);
        assert_relative_eq!(brightness(2.5), 0.5);
        assert_relative_eq!(brightness(5.0), 1.0);
        assert_relative_eq!(brightness(81.0), 1.0);
    }

    #[test]
    fn test_fire_threshold_boundary() {
        assert!(on_fire(0.1, 10.0000001));
        assert!(on_fire(0.5000001, 1.0));
        assert!(on_fire(-0.5000001, 1.0));
        assert!(!on_fire(0.4999999, 9.9999999));
        assert!(!on_fire(-0.4999999, 9.9999999));
        // Exactly at the limit is still safe.
        assert!(!on_fire(0.5, 10.0));
    }

    #[test]
    fn test_classify() {
        let hot = BulbReading::classify(9.0, 81.0);
        assert!(hot.on_fire);
        assert_relative_eq!(hot.brightness, 1.0);

        let dim = BulbReading::classify(0.1, 0.5);
        assert!(!dim.on_fire);
        assert_relative_eq!(dim.brightness, 0.1);
    }
}

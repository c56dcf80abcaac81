use crate::config::{COARSE_THRESHOLD_DEGREES, FINE_THRESHOLD_DEGREES};
use crate::error::RigError;

/// Operator-selectable dead-zone width. Coarse needs a larger head movement
/// before either actuator responds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sensitivity {
    Fine,
    Coarse,
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sensitivity::Fine => write!(f, "fine"),
            Sensitivity::Coarse => write!(f, "coarse"),
        }
    }
}

impl Sensitivity {
    /// Dead-zone threshold in degrees.
    pub fn threshold(&self) -> f64 {
        match self {
            Sensitivity::Fine => FINE_THRESHOLD_DEGREES,
            Sensitivity::Coarse => COARSE_THRESHOLD_DEGREES,
        }
    }

    /// Operator key mapping: exactly 'H' selects coarse, exactly 'L'
    /// selects fine. Anything else, lowercase included, is a no-op.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'H' => Some(Sensitivity::Coarse),
            'L' => Some(Sensitivity::Fine),
            _ => None,
        }
    }
}

/// Direction of travel for one axis. `Hold` means the angle sat inside the
/// dead zone and no movement may be issued, whatever the computed speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisDirection {
    Positive,
    Hold,
    Negative,
}

/// Per-tick output of the angle pipeline for one axis. Ephemeral: computed,
/// consumed by a driver, never retained past the tick (the rig keeps a copy
/// only to re-issue it after a failed sensor read).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisOutput {
    pub direction: AxisDirection,
    /// Angle after clamping to the operating envelope (degrees).
    pub clamped: f64,
    /// Speed magnitude in the driver's command range ([0, 255] for the
    /// linear actuator, [0, 1] for the servo).
    pub speed: f64,
}

/// sign(0) = 0, unlike `f64::signum`.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Constrain an angle to [-max_angle, +max_angle]. Out-of-range values are
/// silently clamped, never reported as errors.
pub fn clamp_angle(angle: f64, max_angle: f64) -> f64 {
    if angle.abs() > max_angle {
        sign(angle) * max_angle
    } else {
        angle
    }
}

/// Straight-line interpolation of `x` from [in_min, in_max] onto
/// [out_min, out_max].
pub fn linear_map(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Run one axis through the shared pipeline: clamp, dead-zone test, speed
/// mapping. Pure and deterministic; both actuators use this with their own
/// `out_max`.
pub fn process_axis(angle: f64, max_angle: f64, threshold: f64, out_max: f64) -> AxisOutput {
    let clamped = clamp_angle(angle, max_angle);
    let speed = linear_map(clamped.abs(), 0.0, max_angle, 0.0, out_max);
    let diff = clamped.abs() - threshold;

    let direction = if diff > 0.0 && clamped > 0.0 {
        AxisDirection::Positive
    } else if diff > 0.0 && clamped < 0.0 {
        AxisDirection::Negative
    } else {
        AxisDirection::Hold
    };

    AxisOutput {
        direction,
        clamped,
        speed,
    }
}

/// Startup invariant: the linear map divides by `max_angle`, so a
/// non-positive envelope is a fatal misconfiguration.
pub fn validate_envelope(max_angle: f64) -> Result<(), RigError> {
    if !max_angle.is_finite() || max_angle <= 0.0 {
        return Err(RigError::InvalidConfiguration(format!(
            "max angle must be a positive number of degrees, got {}",
            max_angle
        )));
    }
    Ok(())
}

/// A threshold at or beyond the envelope leaves that sensitivity mode
/// permanently inside its dead zone. Allowed, but worth surfacing.
pub fn envelope_warnings(max_angle: f64) -> Vec<String> {
    let mut warnings = Vec::new();
    for mode in [Sensitivity::Fine, Sensitivity::Coarse] {
        if mode.threshold() >= max_angle {
            warnings.push(format!(
                "{} threshold ({}°) >= max angle ({}°): axis is permanently dead in {} mode",
                mode,
                mode.threshold(),
                max_angle,
                mode
            ));
        }
    }
    warnings
}

//! HSV to RGB conversion and duty cycle scaling.

use crate::domain::entity::{ColorMode, DUTY_MAX, DutyCycles, LightState};

/// Convert HSV to RGB. All components are fractions in `[0, 1]`.
///
/// The sector index is truncated, so a hue sitting exactly on a sector
/// boundary belongs to the upper sector.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = h * 6.0;
    let sector = libm::trunc(h6);
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Scale a `[0, 1]` fraction to a hardware duty cycle.
///
/// The product is truncated, then clamped into the 10-bit range.
#[inline]
pub fn fraction_to_duty(value: f64) -> u16 {
    clamp_duty((value * f64::from(DUTY_MAX)) as i64)
}

#[inline]
pub(crate) fn clamp_duty(value: i64) -> u16 {
    value.clamp(0, i64::from(DUTY_MAX)) as u16
}

/// Duty cycles for an RGB triple, all fractions in `[0, 1]`
pub fn rgb_to_duty((r, g, b): (f64, f64, f64)) -> DutyCycles {
    DutyCycles::new(
        fraction_to_duty(r),
        fraction_to_duty(g),
        fraction_to_duty(b),
    )
}

/// Target duty cycles for a light state.
///
/// A switched-off light targets zero on every channel.
pub fn target_duty(state: &LightState, mode: ColorMode) -> DutyCycles {
    if !state.is_on() {
        return DutyCycles::OFF;
    }
    let level = f64::from(state.level) / 100.0;
    match mode {
        ColorMode::Hsv => rgb_to_duty(hsv_to_rgb(
            state.hue / 100.0,
            state.saturation / 100.0,
            level,
        )),
        ColorMode::Rgb => {
            let scale = |c: i32| {
                let duty = f64::from(c) / 255.0 * f64::from(DUTY_MAX) * level;
                clamp_duty(duty as i64)
            };
            DutyCycles::new(
                scale(state.red),
                scale(state.green),
                scale(state.blue),
            )
        }
    }
}

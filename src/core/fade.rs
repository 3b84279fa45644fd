//! Fade curves
//!
//! Pure step generators. Driving the PWM port and waiting between steps is
//! done by [`crate::app::usecases::LightUsecases`].

use core::f64::consts::PI;

use crate::core::color::clamp_duty;
use crate::domain::entity::{DUTY_MAX, DutyCycles};

/// Duration of one fade step
pub const FADE_STEP_MS: u32 = 50;

/// Hold time of the single flash when the self-test runs without fading
pub const FLASH_HOLD_MS: u32 = 1000;

/// Number of steps in a fade of `fadetime` milliseconds
#[inline]
pub const fn step_count(fadetime: u32) -> u32 {
    fadetime / FADE_STEP_MS
}

/// Ease-out curve from one duty triple to another.
///
/// Step `t` of `n` moves each channel by
/// `floor(sin((t + 1) / (2n) * π) * (start - target))`; the sine factor
/// reaches exactly 1 on the final step, so the last triple is the target.
#[derive(Debug, Clone)]
pub struct FadeCurve {
    from: DutyCycles,
    to: DutyCycles,
    steps: u32,
    step: u32,
}

impl FadeCurve {
    /// Curve for a fade of `fadetime` milliseconds.
    ///
    /// A zero fade time yields the target as the only step.
    pub fn new(from: DutyCycles, to: DutyCycles, fadetime: u32) -> Self {
        let steps = if fadetime == 0 {
            1
        } else {
            step_count(fadetime).max(1)
        };
        Self::with_steps(from, to, steps)
    }

    pub const fn with_steps(
        from: DutyCycles,
        to: DutyCycles,
        steps: u32,
    ) -> Self {
        Self {
            from,
            to,
            steps,
            step: 0,
        }
    }

    fn duty_at(&self, start: u16, target: u16) -> u16 {
        let start = i64::from(start);
        let target = i64::from(target);
        let delta = start - target;
        let x = f64::from(self.step + 1) / f64::from(self.steps * 2) * PI;
        let eased = libm::floor(libm::sin(x) * delta as f64) as i64;
        clamp_duty(target + delta - eased)
    }
}

impl Iterator for FadeCurve {
    type Item = DutyCycles;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.steps {
            return None;
        }
        let duties = DutyCycles::new(
            self.duty_at(self.from.red, self.to.red),
            self.duty_at(self.from.green, self.to.green),
            self.duty_at(self.from.blue, self.to.blue),
        );
        self.step += 1;
        Some(duties)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps - self.step) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FadeCurve {}

/// Up-and-down pulse used by the boot self-test.
///
/// Step `t` of `n` is `floor(sin((t + 1) / n * π) * 1023)`: full duty at
/// the middle of the pulse, back to zero on the last step.
#[derive(Debug, Clone)]
pub struct PulseCurve {
    steps: u32,
    step: u32,
}

impl PulseCurve {
    pub const fn new(steps: u32) -> Self {
        Self { steps, step: 0 }
    }
}

impl Iterator for PulseCurve {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.steps {
            return None;
        }
        let x = f64::from(self.step + 1) / f64::from(self.steps) * PI;
        self.step += 1;
        Some(clamp_duty(
            libm::floor(libm::sin(x) * f64::from(DUTY_MAX)) as i64,
        ))
    }
}

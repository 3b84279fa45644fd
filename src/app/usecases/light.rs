use embedded_hal_async::delay::DelayNs;

use crate::{
    config::LightConfig,
    core::{
        color::{hsv_to_rgb, rgb_to_duty, target_duty},
        fade::{FADE_STEP_MS, FLASH_HOLD_MS, FadeCurve, PulseCurve, step_count},
    },
    domain::{
        dto::StatePatch,
        entity::{Channel, DUTY_MAX, DutyCycles, LightState},
        ports::{PwmError, PwmPort},
    },
};

/// Channel groups of the boot self-test, in order
const SELF_TEST_GROUPS: [&[Channel]; 8] = [
    &[Channel::Red, Channel::Green, Channel::Blue],
    &[Channel::Red],
    &[Channel::Green],
    &[Channel::Blue],
    &[Channel::Red, Channel::Green],
    &[Channel::Green, Channel::Blue],
    &[Channel::Red, Channel::Blue],
    &[Channel::Red, Channel::Green, Channel::Blue],
];

const DEMO_REPEATS: u32 = 3;
const DEMO_STEPS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightError {
    /// PWM hardware failure, fatal to the node
    Hardware(PwmError),
}

impl From<PwmError> for LightError {
    fn from(err: PwmError) -> Self {
        LightError::Hardware(err)
    }
}

/// Owner of the light state and the PWM outputs.
///
/// Every state change and port access goes through `&mut self`, so a
/// frequency reconciliation can never interleave with a fade.
pub struct LightUsecases<P: PwmPort, D: DelayNs> {
    state: LightState,
    port: P,
    delay: D,
    config: LightConfig,
}

impl<P: PwmPort, D: DelayNs> LightUsecases<P, D> {
    pub fn new(port: P, delay: D, config: LightConfig) -> Self {
        Self {
            state: LightState::new(),
            port,
            delay,
            config,
        }
    }

    pub fn light_state(&self) -> &LightState {
        &self.state
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Merge a state patch, no output change until [`Self::apply_lights`]
    pub fn apply_patch(&mut self, patch: StatePatch<'_>) {
        self.state.apply_patch(patch);
    }

    /// Duty cycles currently driven on the outputs
    pub fn current_duty(&self) -> DutyCycles {
        DutyCycles::new(
            self.port.duty(Channel::Red),
            self.port.duty(Channel::Green),
            self.port.duty(Channel::Blue),
        )
    }

    /// Duty cycles the current state asks for
    pub fn target_duty(&self) -> DutyCycles {
        target_duty(&self.state, self.config.color_mode)
    }

    /// Bring the outputs to the current state.
    ///
    /// Reconciles the PWM frequency first, then fades from the live duty
    /// cycles to the target. Nothing is written when they already match.
    pub async fn apply_lights(&mut self) -> Result<(), LightError> {
        let to = self.target_duty();
        let from = self.current_duty();
        self.reconcile_frequency(from)?;

        if from == to {
            return Ok(());
        }
        log::debug!(
            "light: setting to R={}, G={}, B={} over {}ms",
            to.red,
            to.green,
            to.blue,
            self.state.fadetime
        );

        let fadetime = self.state.fadetime;
        if fadetime == 0 {
            return self.write_duty(to);
        }
        for duties in FadeCurve::new(from, to, fadetime) {
            self.write_duty(duties)?;
            self.delay.delay_ms(FADE_STEP_MS).await;
        }
        Ok(())
    }

    /// Restart every channel if the live frequency differs from the state.
    ///
    /// All channels are stopped before any is restarted, each with the duty
    /// cycle it had before. Returns `true` if the channels were restarted.
    pub fn reconcile_frequency(
        &mut self,
        duty: DutyCycles,
    ) -> Result<bool, LightError> {
        let frequency = self.state.frequency;
        let live = self.port.frequency(Channel::REFERENCE);
        if live == frequency {
            return Ok(false);
        }
        log::info!(
            "light: frequency {} -> {} Hz, restarting channels",
            live,
            frequency
        );
        for channel in Channel::ALL {
            self.port.deinit(channel);
        }
        for channel in Channel::ALL {
            log::debug!(
                "light: init {:?} freq={} duty={}",
                channel,
                frequency,
                duty.get(channel)
            );
            self.port.init(channel, frequency, duty.get(channel))?;
        }
        Ok(true)
    }

    /// Pulse every channel group once, then apply the state.
    ///
    /// Without a fade time each group flashes at full duty instead.
    pub async fn self_test(&mut self) -> Result<(), LightError> {
        if !self.config.self_test {
            return self.apply_lights().await;
        }
        let fadetime = self.state.fadetime;
        for group in SELF_TEST_GROUPS {
            log::debug!("light: testing {:?}", group);
            if fadetime == 0 {
                self.write_group(group, DUTY_MAX)?;
                self.delay.delay_ms(FLASH_HOLD_MS).await;
            } else {
                for duty in PulseCurve::new(step_count(fadetime)) {
                    self.write_group(group, duty)?;
                    self.delay.delay_ms(FADE_STEP_MS).await;
                }
            }
            self.write_group(group, 0)?;
        }
        self.apply_lights().await
    }

    /// Sweep the full hue wheel three times, ignoring the state.
    pub async fn demo(&mut self) -> Result<(), LightError> {
        log::info!("light: demo");
        for _ in 0..DEMO_REPEATS {
            for i in 0..DEMO_STEPS {
                let hue = f64::from(i) / f64::from(DEMO_STEPS);
                self.write_duty(rgb_to_duty(hsv_to_rgb(hue, 1.0, 1.0)))?;
                self.delay.delay_ms(FADE_STEP_MS).await;
            }
        }
        Ok(())
    }

    /// Leave the outputs untouched for a while
    pub async fn hold(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }

    fn write_duty(&mut self, duty: DutyCycles) -> Result<(), LightError> {
        for channel in Channel::ALL {
            self.port.set_duty(channel, duty.get(channel))?;
        }
        Ok(())
    }

    fn write_group(
        &mut self,
        group: &[Channel],
        duty: u16,
    ) -> Result<(), LightError> {
        for channel in group {
            self.port.set_duty(*channel, duty)?;
        }
        Ok(())
    }
}

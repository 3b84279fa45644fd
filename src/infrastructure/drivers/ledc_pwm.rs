use esp_hal::{
    gpio::{AnyPin, DriveMode},
    ledc::{
        Ledc, LowSpeed,
        channel::{self as ledc_channel, ChannelHW as _, ChannelIFace as _},
        timer::{self as ledc_timer, TimerIFace as _},
    },
    time::Rate,
};

use crate::{
    config::PinConfig,
    domain::{
        entity::{Channel, DUTY_MAX},
        ports::{PwmError, PwmPort},
    },
};

type LedcTimer = ledc_timer::Timer<'static, LowSpeed>;
type LedcChannel = ledc_channel::Channel<'static, LowSpeed>;

/// Three LEDC low-speed channels sharing one 10-bit timer.
///
/// A channel is "live" while it holds a configured LEDC channel. The
/// timer is only reconfigured when no channel is live.
pub struct LedcPwmPort {
    ledc: &'static Ledc<'static>,
    timer: *mut LedcTimer,
    timer_frequency: u32,
    pins: [u8; 3],
    channels: [Option<LedcChannel>; 3],
    duty: [u16; 3],
}

impl LedcPwmPort {
    /// Start all channels dark at the given frequency.
    ///
    /// The timer must not be used by anything else.
    pub fn new(
        ledc: &'static Ledc<'static>,
        timer: &'static mut LedcTimer,
        pins: PinConfig,
        frequency: u32,
    ) -> Result<Self, PwmError> {
        let mut port = Self {
            ledc,
            timer: timer as *mut LedcTimer,
            timer_frequency: 0,
            pins: [pins.red, pins.green, pins.blue],
            channels: [None, None, None],
            duty: [0; 3],
        };
        for channel in Channel::ALL {
            port.init(channel, frequency, 0)?;
        }
        Ok(port)
    }

    fn configure_timer(&mut self, frequency: u32) -> Result<(), PwmError> {
        if frequency == 0 {
            return Err(PwmError::InvalidFrequency(frequency));
        }
        if self.channels.iter().any(Option::is_some) {
            log::error!("ledc: timer change with live channels");
            return Err(PwmError::Driver);
        }
        // SAFETY: no channel holds a reference to the timer at this point
        let timer = unsafe { &mut *self.timer };
        timer
            .configure(ledc_timer::config::Config {
                duty: ledc_timer::config::Duty::Duty10Bit,
                clock_source: ledc_timer::LSClockSource::APBClk,
                frequency: Rate::from_hz(frequency),
            })
            .map_err(|_e| {
                log::error!(
                    "ledc: timer config for {} Hz failed: {:?}",
                    frequency,
                    _e
                );
                PwmError::InvalidFrequency(frequency)
            })?;
        self.timer_frequency = frequency;
        Ok(())
    }
}

const fn slot(channel: Channel) -> usize {
    match channel {
        Channel::Red => 0,
        Channel::Green => 1,
        Channel::Blue => 2,
    }
}

const fn channel_number(channel: Channel) -> ledc_channel::Number {
    match channel {
        Channel::Red => ledc_channel::Number::Channel0,
        Channel::Green => ledc_channel::Number::Channel1,
        Channel::Blue => ledc_channel::Number::Channel2,
    }
}

impl PwmPort for LedcPwmPort {
    fn duty(&self, channel: Channel) -> u16 {
        self.duty[slot(channel)]
    }

    fn set_duty(
        &mut self,
        channel: Channel,
        duty: u16,
    ) -> Result<(), PwmError> {
        let duty = duty.min(DUTY_MAX);
        let Some(output) = &self.channels[slot(channel)] else {
            return Err(PwmError::Driver);
        };
        output.set_duty_hw(u32::from(duty));
        self.duty[slot(channel)] = duty;
        Ok(())
    }

    fn frequency(&self, channel: Channel) -> u32 {
        if self.channels[slot(channel)].is_some() {
            self.timer_frequency
        } else {
            0
        }
    }

    fn deinit(&mut self, channel: Channel) {
        if let Some(output) = self.channels[slot(channel)].take() {
            output.set_duty_hw(0);
        }
        self.duty[slot(channel)] = 0;
    }

    fn init(
        &mut self,
        channel: Channel,
        frequency: u32,
        duty: u16,
    ) -> Result<(), PwmError> {
        self.deinit(channel);
        if self.timer_frequency != frequency {
            self.configure_timer(frequency)?;
        }

        // SAFETY: the port owns the pin, the previous channel on it is dropped
        let pin = unsafe { AnyPin::steal(self.pins[slot(channel)]) };
        let mut output =
            self.ledc.channel::<LowSpeed>(channel_number(channel), pin);
        // SAFETY: the timer lives for the whole program and is only mutated
        // while no channel exists
        let timer = unsafe { &*self.timer };
        output
            .configure(ledc_channel::config::Config {
                timer,
                duty_pct: 0,
                drive_mode: DriveMode::PushPull,
            })
            .map_err(|_e| {
                log::error!(
                    "ledc: channel {:?} config failed: {:?}",
                    channel,
                    _e
                );
                PwmError::Driver
            })?;

        let duty = duty.min(DUTY_MAX);
        output.set_duty_hw(u32::from(duty));
        self.channels[slot(channel)] = Some(output);
        self.duty[slot(channel)] = duty;
        Ok(())
    }
}

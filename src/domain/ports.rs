use crate::domain::entity::Channel;

/// PWM hardware failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// The timer can not produce the requested frequency
    InvalidFrequency(u32),
    /// The driver rejected the channel configuration
    Driver,
}

/// Three-channel PWM output.
///
/// All channels share one live frequency, so a frequency change is only
/// done through a full deinit/init of every channel.
pub trait PwmPort {
    /// Current duty cycle of a channel
    fn duty(&self, channel: Channel) -> u16;

    /// Set the duty cycle of a channel (0-1023)
    fn set_duty(&mut self, channel: Channel, duty: u16) -> Result<(), PwmError>;

    /// Live frequency of a channel in Hz
    fn frequency(&self, channel: Channel) -> u32;

    /// Stop a channel output
    fn deinit(&mut self, channel: Channel);

    /// Start a channel at the given frequency and duty cycle
    fn init(
        &mut self,
        channel: Channel,
        frequency: u32,
        duty: u16,
    ) -> Result<(), PwmError>;
}

/// Hardware reset
pub trait SystemReset {
    /// Reboot the node. Implementations on real hardware never return.
    fn reset(&mut self);
}

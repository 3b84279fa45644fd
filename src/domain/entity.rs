use heapless::String;
use serde::{Deserialize, Serialize};

use crate::{core::text::truncated, domain::dto::StatePatch};

/// Shortest non-zero fade, one fade step.
pub const MIN_FADE_TIME_MS: u32 = 50;

/// Maximum duty cycle accepted by the PWM hardware (10-bit).
pub const DUTY_MAX: u16 = 1023;

/// Longest stored `hex` color string, longer ones are cut
pub const HEX_MAX_LEN: usize = 32;

/// Power switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Switch {
    On,
    Off,
}

/// How channel targets are derived from the light state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Hue and saturation, `level` as HSV value
    Hsv,
    /// Red, green and blue scaled by `level`
    Rgb,
}

/// PWM output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Reference channel for the shared PWM frequency
    pub const REFERENCE: Channel = Channel::Red;
}

/// Duty cycles of the three channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DutyCycles {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl DutyCycles {
    pub const OFF: DutyCycles = DutyCycles::new(0, 0, 0);

    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    pub const fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }
}

/// Represents the light state.
///
/// The field order is the order of the JSON echo sent back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    #[serde(rename = "switch")]
    pub power: Switch,
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub hex: String<HEX_MAX_LEN>,
    pub hue: f64,
    pub saturation: f64,
    pub level: i32,
    pub frequency: u32,
    pub fadetime: u32,
}

impl LightState {
    /// Create the power-on light state
    pub fn new() -> Self {
        Self {
            power: Switch::Off,
            red: 253,
            green: 248,
            blue: 236,
            hex: truncated("#FDF8EC"),
            hue: 11.7647,
            saturation: 6.719_37,
            level: 100,
            frequency: 100,
            fadetime: 1000,
        }
    }

    pub fn is_on(&self) -> bool {
        self.power == Switch::On
    }

    /// Merge a state patch.
    ///
    /// Absent fields keep their value. A non-zero fade time shorter than
    /// one fade step is raised to [`MIN_FADE_TIME_MS`] and `hex` is cut to
    /// [`HEX_MAX_LEN`]. Everything else is stored as received.
    pub fn apply_patch(&mut self, patch: StatePatch<'_>) {
        if let Some(power) = patch.power {
            self.power = power;
        }
        if let Some(red) = patch.red {
            self.red = red;
        }
        if let Some(green) = patch.green {
            self.green = green;
        }
        if let Some(blue) = patch.blue {
            self.blue = blue;
        }
        if let Some(hex) = patch.hex {
            self.hex = truncated(hex);
        }
        if let Some(hue) = patch.hue {
            self.hue = hue;
        }
        if let Some(saturation) = patch.saturation {
            self.saturation = saturation;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(fadetime) = patch.fadetime {
            self.fadetime = if fadetime > 0 && fadetime < MIN_FADE_TIME_MS {
                MIN_FADE_TIME_MS
            } else {
                fadetime
            };
        }
    }
}

impl Default for LightState {
    /// Create a new light state with default values
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_fade_time_is_raised_to_one_step() {
        for fadetime in 1..MIN_FADE_TIME_MS {
            let mut state = LightState::new();
            state.apply_patch(StatePatch {
                fadetime: Some(fadetime),
                ..StatePatch::default()
            });
            assert_eq!(state.fadetime, MIN_FADE_TIME_MS);
        }
    }

    #[test]
    fn zero_fade_time_is_kept() {
        let mut state = LightState::new();
        state.apply_patch(StatePatch {
            fadetime: Some(0),
            ..StatePatch::default()
        });
        assert_eq!(state.fadetime, 0);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut state = LightState::new();
        state.apply_patch(StatePatch::default());
        assert_eq!(state, LightState::new());
    }

    #[test]
    fn out_of_range_values_are_stored_verbatim() {
        let mut state = LightState::new();
        state.apply_patch(StatePatch {
            red: Some(400),
            level: Some(-5),
            ..StatePatch::default()
        });
        assert_eq!(state.red, 400);
        assert_eq!(state.level, -5);
    }

    #[test]
    fn long_hex_is_cut() {
        let long = "#FDF8EC-with-a-very-long-color-name";
        let mut state = LightState::new();
        state.apply_patch(StatePatch {
            hex: Some(long),
            ..StatePatch::default()
        });
        assert_eq!(state.hex.as_str(), &long[..HEX_MAX_LEN]);
    }
}

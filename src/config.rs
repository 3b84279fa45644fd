use crate::domain::entity::ColorMode;

/// Light behaviour switches
#[derive(Debug, Clone, Copy)]
pub struct LightConfig {
    /// How channel targets are derived from the light state
    pub color_mode: ColorMode,
    /// Run the channel self-test at boot
    pub self_test: bool,
}

/// HTTP control endpoint settings
#[derive(Debug, Clone, Copy)]
pub struct ControlConfig {
    /// Shared secret expected in the request `auth` field
    pub auth_secret: Option<&'static str>,
}

/// GPIO numbers of the PWM outputs
#[derive(Debug, Clone, Copy)]
pub struct PinConfig {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Remote log sink
#[derive(Debug, Clone, Copy)]
pub struct SyslogConfig {
    /// IPv4 address of the collector, forwarding is off when `None`
    pub host: Option<&'static str>,
    /// Host name reported in each line
    pub id: &'static str,
    /// Tag reported in each line
    pub tag: &'static str,
}

pub const LISTEN_PORT: u16 = 8080;

/// Socket timeout bounding header and body reads
pub const READ_TIMEOUT_SECS: u64 = 10;

/// Delay between the `reset` response and the reboot
pub const RESET_DELAY_MS: u32 = 1000;

pub const LIGHT: LightConfig = LightConfig {
    color_mode: if cfg!(feature = "rgb-mode") {
        ColorMode::Rgb
    } else {
        ColorMode::Hsv
    },
    self_test: !cfg!(feature = "no-self-test"),
};

pub const CONTROL: ControlConfig = ControlConfig {
    auth_secret: option_env!("RGB_NODE_AUTH_SECRET"),
};

pub const PINS: PinConfig = PinConfig {
    red: 13,
    green: 12,
    blue: 14,
};

pub const SYSLOG: SyslogConfig = SyslogConfig {
    host: option_env!("RGB_NODE_SYSLOG_HOST"),
    id: "demirgb",
    tag: "demirgb",
};

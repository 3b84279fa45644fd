mod ledc_pwm;
mod reset;
pub mod wifi_sta;

pub use ledc_pwm::LedcPwmPort;
pub use reset::EspReset;
pub use wifi_sta::{WifiError, start_wifi_sta};

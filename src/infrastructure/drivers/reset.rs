use crate::domain::ports::SystemReset;

/// Chip reset through the system peripheral
#[derive(Debug, Default, Clone, Copy)]
pub struct EspReset;

impl SystemReset for EspReset {
    fn reset(&mut self) {
        log::warn!("system: rebooting");
        esp_hal::system::software_reset();
    }
}

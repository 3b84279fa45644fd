//! BSD syslog line formatting
//!
//! Lines are `<PRI>{host} {tag}: {message}` with facility `local0`.

use core::fmt::{self, Write as _};

use heapless::String;
use log::Level;

use crate::core::text::Truncating;

/// Default syslog UDP port
pub const SYSLOG_PORT: u16 = 514;

/// Longest forwarded line; longer messages are cut
pub const SYSLOG_LINE_MAX_LEN: usize = 192;

pub type SyslogLine = String<SYSLOG_LINE_MAX_LEN>;

const FACILITY_LOCAL0: u8 = 16;

/// Syslog severity of a log level
pub const fn severity(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

/// Syslog priority value of a log level
pub const fn priority(level: Level) -> u8 {
    FACILITY_LOCAL0 * 8 + severity(level)
}

/// Format a syslog line. Text that does not fit is dropped.
pub fn format_line(
    level: Level,
    host: &str,
    tag: &str,
    message: fmt::Arguments<'_>,
) -> SyslogLine {
    let mut line = SyslogLine::new();
    let _ = write!(
        Truncating(&mut line),
        "<{}>{} {}: {}",
        priority(level),
        host,
        tag,
        message
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_records_use_local0_debug() {
        assert_eq!(priority(Level::Debug), 135);
        assert_eq!(priority(Level::Error), 131);
        assert_eq!(priority(Level::Info), 134);
    }

    #[test]
    fn line_layout() {
        let line = format_line(
            Level::Debug,
            "rgb-node",
            "demirgb",
            format_args!("light: fading to R={}", 1023),
        );
        assert_eq!(
            line.as_str(),
            "<135>rgb-node demirgb: light: fading to R=1023"
        );
    }

    #[test]
    fn long_messages_are_cut() {
        let long = "x".repeat(400);
        let line = format_line(Level::Info, "h", "t", format_args!("{}", long));
        assert_eq!(line.len(), SYSLOG_LINE_MAX_LEN);
        assert!(line.starts_with("<134>h t: xxx"));
    }
}

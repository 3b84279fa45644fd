//! Console logger with optional syslog forwarding.
//!
//! Every record goes to the serial console. When a syslog collector is
//! configured, a formatted copy is queued for the syslog task; records are
//! dropped rather than blocking when the queue is full.

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver},
};
use esp_println::println;
use log::{LevelFilter, Log, Metadata, Record};

use crate::{
    config::SYSLOG,
    core::net::syslog::{SyslogLine, format_line},
};

const SYSLOG_QUEUE_DEPTH: usize = 8;

type SyslogQueue =
    Channel<CriticalSectionRawMutex, SyslogLine, SYSLOG_QUEUE_DEPTH>;

static SYSLOG_QUEUE: SyslogQueue = Channel::new();

static LOGGER: NodeLogger = NodeLogger {
    forward: SYSLOG.host.is_some(),
};

struct NodeLogger {
    forward: bool,
}

impl Log for NodeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        println!("{} - {}", record.level(), record.args());
        if self.forward {
            let line = format_line(
                record.level(),
                SYSLOG.id,
                SYSLOG.tag,
                *record.args(),
            );
            let _ = SYSLOG_QUEUE.try_send(line);
        }
    }

    fn flush(&self) {}
}

/// Install the node logger. Later calls are ignored.
pub fn init_logger(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Queue of formatted lines waiting for the syslog task
pub fn syslog_receiver()
-> Receiver<'static, CriticalSectionRawMutex, SyslogLine, SYSLOG_QUEUE_DEPTH> {
    SYSLOG_QUEUE.receiver()
}

mod logger;
mod tcp;

pub use logger::{init_logger, syslog_receiver};

mod http_server;
mod syslog;

pub use http_server::{LightController, http_server_task};
pub use syslog::syslog_task;

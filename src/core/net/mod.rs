pub mod http;
pub mod syslog;

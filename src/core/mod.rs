//! Hardware-independent building blocks: color math, fade curves and the
//! HTTP/syslog wire formats.

pub mod color;
pub mod fade;
pub mod net;
pub mod text;

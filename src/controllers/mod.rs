mod http;

pub use http::{ControlError, LightHttpController};

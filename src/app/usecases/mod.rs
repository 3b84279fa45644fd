mod light;
pub mod protocol;

pub use light::{LightError, LightUsecases};
pub use protocol::{ProtocolError, authorize, decode_request};

use crate::domain::dto::ControlRequest;

/// Control request rejected before any state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Body is not a valid control request
    Decode,
    /// Missing or wrong `auth` secret
    Unauthorized,
}

impl ProtocolError {
    /// HTTP status code sent for the error
    pub const fn status(self) -> u16 {
        match self {
            ProtocolError::Decode => 500,
            ProtocolError::Unauthorized => 401,
        }
    }
}

/// Decode a control request body
///
/// String fields borrow from `body`.
pub fn decode_request(
    body: &[u8],
) -> Result<ControlRequest<'_>, ProtocolError> {
    serde_json_core::from_slice::<ControlRequest<'_>>(body)
        .map(|(request, _)| request)
        .map_err(|_e| {
            log::debug!("protocol: decode error: {:?}", _e);
            ProtocolError::Decode
        })
}

/// Check the request secret against the configured one.
///
/// Every request passes when no secret is configured.
pub fn authorize(
    request: &ControlRequest<'_>,
    secret: Option<&str>,
) -> Result<(), ProtocolError> {
    match secret {
        None => Ok(()),
        Some(secret) if request.auth == Some(secret) => Ok(()),
        Some(_) => Err(ProtocolError::Unauthorized),
    }
}

pub(crate) mod connection;
pub(crate) mod headers;
pub(crate) mod request;
pub(crate) mod server;

pub use connection::HttpConnection;
pub use headers::{
    ContentHeaders, ContentType, HttpVersion, ResponseHeaders, TextEncoding,
};
pub use request::{
    BODY_MAX_LEN, LINE_MAX_LEN, PATH_MAX_LEN, Request, RequestReader,
};
pub use server::{Connection, HttpHandler};

/// Malformed or unsupported request framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    /// Start line is not a POST
    BadMethod,
    /// Stream closed before the start line
    Closed,
    /// A start or header line does not fit the line buffer
    LineTooLong,
    /// `Content-Length` is not a number
    BadContentLength,
    /// Declared body does not fit the body buffer
    BodyTooLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Framing(FramingError),
    Io(embedded_io::ErrorKind),
    FormatHeaders,
    Encode,
}

impl Error {
    pub(crate) fn io<E: embedded_io::Error>(err: E) -> Self {
        Error::Io(err.kind())
    }
}

impl From<FramingError> for Error {
    fn from(err: FramingError) -> Self {
        Error::Framing(err)
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_error: core::fmt::Error) -> Self {
        Error::FormatHeaders
    }
}

pub type HttpResult = Result<(), Error>;

use core::fmt::Write;

pub type StatusCode = u16;

pub(crate) fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// HTTP protocol version of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    Http11,
}

impl HttpVersion {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
        }
    }
}

/// HTTP Content Type.
#[derive(Debug)]
pub enum ContentType {
    Json,
}

impl ContentType {
    /// Convert the content type to a string.
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => "application/json",
        }
    }
}

/// Text Encoding.
#[derive(Debug)]
pub enum TextEncoding {
    Utf8,
}

impl TextEncoding {
    /// Convert the text encoding to a string.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
        }
    }
}

/// HTTP socket connection policy.
#[derive(Debug)]
pub(super) enum ConnectionPolicy {
    Close,
}

impl ConnectionPolicy {
    /// Convert the connection type to a string.
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ConnectionPolicy::Close => "close",
        }
    }
}

pub(super) trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error>;
}

/// HTTP Content Headers.
pub struct ContentHeaders {
    content_type: ContentType,
    content_length: Option<usize>,
    text_encoding: Option<TextEncoding>,
}

impl ContentHeaders {
    /// Create a new content headers with a content type.
    pub const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_length: None,
            text_encoding: None,
        }
    }

    /// Set the content length.
    #[must_use]
    pub const fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Set the text encoding.
    #[must_use]
    pub const fn with_text_encoding(
        mut self,
        text_encoding: TextEncoding,
    ) -> Self {
        self.text_encoding = Some(text_encoding);
        self
    }
}

impl TargetWriter for ContentHeaders {
    fn write_to(
        &self,
        writer: &mut impl Write,
    ) -> Result<(), core::fmt::Error> {
        write!(writer, "Content-Type: {}", self.content_type.as_str())?;
        if let Some(text_encoding) = &self.text_encoding {
            write!(writer, "; charset={}", text_encoding.as_str())?;
        }
        write!(writer, "\r\n")?;
        if let Some(content_length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", content_length)?;
        }
        Ok(())
    }
}

/// Response Headers.
pub struct ResponseHeaders {
    version: HttpVersion,
    status: StatusCode,
    connection: Option<ConnectionPolicy>,
    content: Option<ContentHeaders>,
}

impl ResponseHeaders {
    /// Create empty response headers with a status code.
    pub const fn from_code(code: StatusCode) -> Self {
        Self {
            version: HttpVersion::Http11,
            status: code,
            content: None,
            connection: Some(ConnectionPolicy::Close),
        }
    }

    /// Set the success status code.
    pub const fn success() -> Self {
        Self::from_code(200)
    }

    /// Bare HTTP/1.0 status line for an error response.
    pub const fn failure(code: StatusCode) -> Self {
        Self {
            version: HttpVersion::Http10,
            status: code,
            content: None,
            connection: None,
        }
    }

    /// Set the content headers.
    #[must_use]
    pub const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }
}

impl TargetWriter for ResponseHeaders {
    /// Write the response headers to a writer.
    fn write_to(
        &self,
        writer: &mut impl Write,
    ) -> Result<(), core::fmt::Error> {
        let reason = reason_phrase(self.status);
        let version = self.version.as_str();
        write!(writer, "{} {} {}\r\n", version, self.status, reason)?;
        if let Some(content) = &self.content {
            content.write_to(writer)?;
        }
        if let Some(connection) = &self.connection {
            write!(writer, "Connection: {}\r\n", connection.as_str())?;
        }
        write!(writer, "\r\n")?;
        Ok(())
    }
}

/// Parse the value of a `Content-Length` header line.
///
/// Returns `None` if the line is another header, `Some(Err(()))` if the
/// value is not a number.
pub(super) fn parse_content_length(line: &[u8]) -> Option<Result<usize, ()>> {
    const TARGET: &[u8] = b"content-length:";
    if !line.get(..TARGET.len())?.eq_ignore_ascii_case(TARGET) {
        return None;
    }
    let value = core::str::from_utf8(&line[TARGET.len()..])
        .map(str::trim)
        .map_err(|_| ());
    Some(value.and_then(|v| v.parse::<usize>().map_err(|_| ())))
}

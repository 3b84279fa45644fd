//! Line-oriented POST request reader
//!
//! Reads the start line and headers one byte at a time so nothing past the
//! header terminator is consumed, then reads exactly `Content-Length` bytes
//! of body.

use embedded_io_async::Read;
use heapless::{String, Vec};

use super::{Error, FramingError, headers::parse_content_length};

use crate::core::text::truncated;

/// Longest accepted start or header line, carriage return included
pub const LINE_MAX_LEN: usize = 256;

/// Largest accepted request body
pub const BODY_MAX_LEN: usize = 1024;

pub const PATH_MAX_LEN: usize = 64;

/// Framed POST request
#[derive(Debug, Default)]
pub struct Request {
    pub path: String<PATH_MAX_LEN>,
    pub content_length: usize,
    pub body: Vec<u8, BODY_MAX_LEN>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    StartLine,
    Headers,
    Body,
}

/// Incremental request framer over a byte stream
pub struct RequestReader<'a, S: Read> {
    stream: &'a mut S,
    state: ReaderState,
    line: Vec<u8, LINE_MAX_LEN>,
}

impl<'a, S: Read> RequestReader<'a, S> {
    pub fn new(stream: &'a mut S) -> Self {
        Self {
            stream,
            state: ReaderState::StartLine,
            line: Vec::new(),
        }
    }

    /// Read one full request.
    ///
    /// A stream closing during the headers yields an empty body, and a
    /// stream closing during the body yields the bytes received so far.
    pub async fn read_request(mut self) -> Result<Request, Error> {
        let mut request = Request::default();
        loop {
            match self.state {
                ReaderState::StartLine => {
                    if !self.read_line().await? {
                        return Err(FramingError::Closed.into());
                    }
                    request.path = parse_start_line(&self.line)?;
                    self.state = ReaderState::Headers;
                }
                ReaderState::Headers => {
                    if !self.read_line().await? {
                        log::debug!("http: stream closed in headers");
                        return Ok(request);
                    }
                    if self.line.is_empty() {
                        self.state = ReaderState::Body;
                    } else if let Some(length) =
                        parse_content_length(&self.line)
                    {
                        let length = length
                            .map_err(|()| FramingError::BadContentLength)?;
                        if length > BODY_MAX_LEN {
                            return Err(FramingError::BodyTooLarge.into());
                        }
                        request.content_length = length;
                    }
                }
                ReaderState::Body => {
                    self.read_body(&mut request).await?;
                    return Ok(request);
                }
            }
        }
    }

    /// Read a line into the line buffer, without its terminator.
    ///
    /// Returns `false` if the stream closed before any byte of the line.
    async fn read_line(&mut self) -> Result<bool, Error> {
        self.line.clear();
        let mut byte = [0u8; 1];
        let mut received = false;
        loop {
            let n = self.stream.read(&mut byte).await.map_err(Error::io)?;
            if n == 0 {
                return Ok(received);
            }
            received = true;
            match byte[0] {
                b'\n' => {
                    if self.line.last() == Some(&b'\r') {
                        self.line.pop();
                    }
                    return Ok(true);
                }
                b => self
                    .line
                    .push(b)
                    .map_err(|_| Error::from(FramingError::LineTooLong))?,
            }
        }
    }

    async fn read_body(&mut self, request: &mut Request) -> Result<(), Error> {
        let mut chunk = [0u8; 256];
        while request.body.len() < request.content_length {
            let left = request.content_length - request.body.len();
            let wanted = left.min(chunk.len());
            let n = self
                .stream
                .read(&mut chunk[..wanted])
                .await
                .map_err(Error::io)?;
            if n == 0 {
                log::debug!(
                    "http: body closed at {}/{} bytes",
                    request.body.len(),
                    request.content_length
                );
                break;
            }
            request
                .body
                .extend_from_slice(&chunk[..n])
                .map_err(|()| Error::from(FramingError::BodyTooLarge))?;
        }
        Ok(())
    }
}

/// Check the start line is a POST and extract the request path.
fn parse_start_line(line: &[u8]) -> Result<String<PATH_MAX_LEN>, FramingError> {
    let rest = line.strip_prefix(b"POST ").ok_or(FramingError::BadMethod)?;
    let raw_path = rest.split(|b| *b == b' ').next().unwrap_or_default();
    // Keep the valid UTF-8 prefix of the path, cut to fit
    let valid = match core::str::from_utf8(raw_path) {
        Ok(path) => path,
        Err(e) => core::str::from_utf8(&raw_path[..e.valid_up_to()])
            .unwrap_or_default(),
    };
    Ok(truncated(valid))
}

use embedded_io_async::Write as _;
use heapless::{String, Vec};
use serde::Serialize;

use super::{
    Error,
    HttpResult,
    headers::{
        ContentHeaders,
        ContentType,
        ResponseHeaders,
        TargetWriter as _,
        TextEncoding,
        reason_phrase,
    },
    request::{Request, RequestReader},
    server::Connection,
};

const HEADER_BUFFER_SIZE: usize = 256;
const BODY_BUFFER_SIZE: usize = 512;

/// HTTP connection context
pub struct HttpConnection<'a, C: Connection> {
    stream: &'a mut C,
    header_buf: String<HEADER_BUFFER_SIZE>,
    body_buf: Vec<u8, BODY_BUFFER_SIZE>,
}

impl<'a, C: Connection> HttpConnection<'a, C> {
    pub fn new(stream: &'a mut C) -> Self {
        Self {
            stream,
            header_buf: String::new(),
            body_buf: Vec::new(),
        }
    }

    /// Read the request line, headers and body
    pub async fn read_request(&mut self) -> Result<Request, Error> {
        RequestReader::new(&mut *self.stream).read_request().await
    }

    /// Write the headers to the connection
    pub async fn write_headers(
        &mut self,
        headers: &ResponseHeaders,
    ) -> HttpResult {
        self.header_buf.clear();
        headers.write_to(&mut self.header_buf)?;
        self.stream
            .write_all(self.header_buf.as_bytes())
            .await
            .map_err(Error::io)?;
        self.flush().await
    }

    /// Write JSON to the connection
    ///
    /// Writes both headers and body.
    pub async fn write_json<T: Serialize>(&mut self, data: &T) -> HttpResult {
        self.body_buf.clear();
        self.body_buf
            .resize_default(BODY_BUFFER_SIZE)
            .map_err(|()| Error::Encode)?;
        let n = serde_json_core::to_slice(data, self.body_buf.as_mut_slice())
            .map_err(|_| Error::Encode)?;
        self.body_buf.truncate(n);
        let headers = ResponseHeaders::success().with_content(
            ContentHeaders::new(ContentType::Json)
                .with_text_encoding(TextEncoding::Utf8)
                .with_length(n),
        );

        self.write_headers(&headers).await?;
        self.stream
            .write_all(self.body_buf.as_slice())
            .await
            .map_err(Error::io)?;
        self.flush().await
    }

    /// Write a bare error response: status line, blank line, reason.
    pub async fn write_error(&mut self, code: u16) -> HttpResult {
        log::warn!("http: error {} ({})", reason_phrase(code), code);
        self.write_headers(&ResponseHeaders::failure(code)).await?;
        let reason = reason_phrase(code);
        self.stream
            .write_all(reason.as_bytes())
            .await
            .map_err(Error::io)?;
        self.write_all(b"\r\n").await
    }

    /// Close the underlying stream
    pub async fn close(self) {
        self.stream.close().await;
    }

    async fn write_all(&mut self, buf: &[u8]) -> HttpResult {
        self.stream.write_all(buf).await.map_err(Error::io)?;
        self.flush().await
    }

    async fn flush(&mut self) -> HttpResult {
        self.stream.flush().await.map_err(Error::io)
    }
}

use embedded_io_async::{Read, Write};

use super::connection::HttpConnection;

/// Byte stream of one accepted client
pub trait Connection: Read + Write {
    /// Flush pending output and close the stream
    async fn close(&mut self);
}

/// Services one connection at a time.
///
/// The handler takes `&mut self`: one request is fully handled, side
/// effects included, before the next connection is accepted.
pub trait HttpHandler {
    type Error;

    async fn handle_request<C: Connection>(
        &mut self,
        conn: HttpConnection<'_, C>,
    ) -> Result<(), Self::Error>;
}

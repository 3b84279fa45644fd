use embassy_net::tcp::TcpSocket;

use crate::core::net::http::Connection;

impl Connection for TcpSocket<'_> {
    async fn close(&mut self) {
        if let Err(e) = self.flush().await {
            log::debug!("tcp: flush before close failed: {:?}", e);
        }
        TcpSocket::close(self);
    }
}

use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::{Delay, Duration, Timer};

use crate::{
    config::{LISTEN_PORT, READ_TIMEOUT_SECS, RESET_DELAY_MS},
    controllers::{ControlError, LightHttpController},
    core::net::http::{HttpConnection, HttpHandler as _},
    domain::ports::SystemReset as _,
    infrastructure::drivers::{EspReset, LedcPwmPort},
};

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 2048;

pub type LightController = LightHttpController<LedcPwmPort, Delay, EspReset>;

/// Serve control requests, one connection at a time.
///
/// A connection is fully handled, fade included, before the next one is
/// accepted. A PWM failure reboots the node.
#[embassy_executor::task]
pub async fn http_server_task(
    stack: Stack<'static>,
    controller: &'static mut LightController,
) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    log::info!("http_server: listening on port {}", LISTEN_PORT);

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(READ_TIMEOUT_SECS)));

        if let Err(e) = socket.accept(LISTEN_PORT).await {
            log::warn!("http_server: accept error: {:?}", e);
            continue;
        }
        log::debug!(
            "http_server: connection from {:?}",
            socket.remote_endpoint()
        );

        let conn = HttpConnection::new(&mut socket);
        match controller.handle_request(conn).await {
            Ok(()) => {}
            Err(ControlError::Http(e)) => {
                log::warn!("http_server: connection error: {:?}", e);
            }
            Err(ControlError::Light(e)) => {
                log::error!("http_server: light failure, rebooting: {:?}", e);
                let delay = u64::from(RESET_DELAY_MS);
                Timer::after(Duration::from_millis(delay)).await;
                EspReset.reset();
            }
        }
        socket.abort();
    }
}

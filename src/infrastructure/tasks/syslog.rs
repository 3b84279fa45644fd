use embassy_net::{
    IpEndpoint, Ipv4Address, Stack,
    udp::{PacketMetadata, UdpSocket},
};
use esp_println::println;

use crate::{
    config::SYSLOG, core::net::syslog::SYSLOG_PORT,
    infrastructure::adapters::syslog_receiver,
};

/// Forward queued log lines to the syslog collector over UDP.
///
/// Reports its own failures on the console only, so they are never
/// queued again.
#[embassy_executor::task]
pub async fn syslog_task(stack: Stack<'static>) {
    let Some(host) = SYSLOG.host else {
        return;
    };
    let Ok(address) = host.parse::<Ipv4Address>() else {
        println!("syslog: invalid collector address {}", host);
        return;
    };
    let remote = IpEndpoint::new(address.into(), SYSLOG_PORT);

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; 16];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_buffer = [0u8; 1024];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    if let Err(e) = socket.bind(0) {
        println!("syslog: failed to bind: {:?}", e);
        return;
    }

    let receiver = syslog_receiver();
    loop {
        let line = receiver.receive().await;
        if let Err(e) = socket.send_to(line.as_bytes(), remote).await {
            println!("syslog: send failed: {:?}", e);
        }
    }
}

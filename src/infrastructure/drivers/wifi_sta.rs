use core::str::FromStr as _;

use embassy_executor::Spawner;
use embassy_net::{DhcpConfig, Runner, Stack, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};
use esp_hal::{peripherals::WIFI, rng::Rng};
use esp_radio::wifi::{
    AuthMethod, ClientConfig, Config, ModeConfig, WifiController, WifiDevice,
    WifiEvent, WifiStaState,
};

use crate::{infrastructure::config, mk_static};

/// Sockets: the HTTP listener, the syslog sender, DHCP and DNS
const MAX_NETWORK_CONNECTIONS: usize = 4;

const MAX_HOSTNAME_LEN: usize = 32;

pub type Hostname = heapless::String<MAX_HOSTNAME_LEN>;

/// Wi-Fi bring-up failure
#[derive(Debug)]
pub enum WifiError {
    Radio(esp_radio::InitializationError),
    Wifi(esp_radio::wifi::WifiError),
    Hostname,
}

/// Join the configured network and wait for a DHCP lease.
///
/// Spawns the link supervisor and the stack runner. A lost link is
/// rejoined in the background.
pub async fn start_wifi_sta(
    spawner: Spawner,
    wifi_device: WIFI<'static>,
) -> Result<(Stack<'static>, StaticConfigV4), WifiError> {
    let radio = esp_radio::init().map_err(WifiError::Radio)?;
    let radio = &*mk_static!(esp_radio::Controller<'static>, radio);
    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi_device, Config::default())
            .map_err(WifiError::Wifi)?;

    let hostname = Hostname::from_str(config::DEVICE.hostname)
        .map_err(|()| WifiError::Hostname)?;
    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = Some(hostname);
    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let resources = mk_static!(
        StackResources<MAX_NETWORK_CONNECTIONS>,
        StackResources::<MAX_NETWORK_CONNECTIONS>::new()
    );
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, resources, get_seed());

    spawner.spawn(wifi_connection_task(controller)).ok();
    spawner.spawn(network_runner_task(runner)).ok();

    let ip = wait_for_connection(stack).await;
    Ok((stack, ip))
}

/// Keeps the station joined, retrying every few seconds
#[embassy_executor::task]
async fn wifi_connection_task(mut controller: WifiController<'static>) {
    loop {
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            log::warn!("network: link lost");
            Timer::after(Duration::from_millis(2000)).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            let client_config = if config::WIFI.password.is_empty() {
                ClientConfig::default()
                    .with_ssid(config::WIFI.ssid.into())
                    .with_auth_method(AuthMethod::None)
            } else {
                ClientConfig::default()
                    .with_ssid(config::WIFI.ssid.into())
                    .with_password(config::WIFI.password.into())
            };
            let mode = ModeConfig::Client(client_config);
            let started = match controller.set_config(&mode) {
                Ok(()) => controller.start_async().await,
                Err(e) => Err(e),
            };
            if let Err(e) = started {
                log::error!("network: radio start failed: {:?}", e);
                Timer::after(Duration::from_millis(5000)).await;
                continue;
            }
        }

        log::info!("network: connecting to {}", config::WIFI.ssid);
        if let Err(e) = controller.connect_async().await {
            log::warn!("network: error connecting: {:?}", e);
            Timer::after(Duration::from_millis(5000)).await;
        }
    }
}

#[embassy_executor::task]
async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}

/// Wait for the link, then for an IPv4 address
async fn wait_for_connection(stack: Stack<'_>) -> StaticConfigV4 {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(100)).await;
    }
    loop {
        if let Some(config) = stack.config_v4() {
            return config;
        }
        Timer::after(Duration::from_millis(100)).await;
    }
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    u64::from(rng.random()) << 32 | u64::from(rng.random())
}

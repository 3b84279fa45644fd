#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{
    clock::CpuClock,
    ledc::{LSGlobalClkSource, Ledc, LowSpeed, timer},
    timer::timg::TimerGroup,
};
use log::LevelFilter;

use rgb_pwm_node::app::LightUsecases;
use rgb_pwm_node::config::{self, RESET_DELAY_MS};
use rgb_pwm_node::controllers::LightHttpController;
use rgb_pwm_node::domain::entity::LightState;
use rgb_pwm_node::domain::ports::SystemReset as _;
use rgb_pwm_node::infrastructure::adapters::init_logger;
use rgb_pwm_node::infrastructure::drivers::{
    EspReset, LedcPwmPort, start_wifi_sta,
};
use rgb_pwm_node::infrastructure::tasks::{
    LightController, http_server_task, syslog_task,
};
use rgb_pwm_node::mk_static;

esp_bootloader_esp_idf::esp_app_desc!();

const LOG_LEVEL: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    init_logger(LOG_LEVEL);

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Allocate heap memory for the radio
    esp_alloc::heap_allocator!(
        #[unsafe(link_section = ".dram2_uninit")] size: 64 * 1024
    );

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // PWM outputs, dark until the self-test
    let mut ledc = Ledc::new(peripherals.LEDC);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);
    let ledc: &'static Ledc<'static> = mk_static!(Ledc<'static>, ledc);
    let pwm_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    let pwm_timer = mk_static!(timer::Timer<'static, LowSpeed>, pwm_timer);
    let frequency = LightState::new().frequency;
    let port = LedcPwmPort::new(ledc, pwm_timer, config::PINS, frequency);
    let port = match port {
        Ok(port) => port,
        Err(e) => halt("PWM init failed", e).await,
    };

    let mut light = LightUsecases::new(port, Delay, config::LIGHT);
    if let Err(e) = light.self_test().await {
        halt("self-test failed", e).await;
    }

    let controller = mk_static!(
        LightController,
        LightHttpController::new(light, EspReset, config::CONTROL)
    );

    let (stack, ip) = match start_wifi_sta(spawner, peripherals.WIFI).await {
        Ok(network) => network,
        Err(e) => halt("network start failed", e).await,
    };
    log::info!("network: got address {}", ip.address);

    spawner.spawn(syslog_task(stack)).ok();
    spawner.spawn(http_server_task(stack, controller)).ok();

    loop {
        Timer::after(Duration::from_secs(5)).await;
    }
}

/// Log a fatal boot error and reboot
async fn halt(what: &str, error: impl core::fmt::Debug) -> ! {
    log::error!("boot: {}: {:?}", what, error);
    Timer::after(Duration::from_millis(u64::from(RESET_DELAY_MS))).await;
    EspReset.reset();
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

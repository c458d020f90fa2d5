//! Temperature sampler firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            LogEventSink      NvsAdapter       │
//! │  (I2C · timer · UART ·      (EventSink)       (ConfigPort)     │
//! │   probe · LED)                                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            Dispatcher (single control thread)          │    │
//! │  │  SamplingPeriod · TemperatureSensor · Outbox           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  EventFlags ◀── esp_timer task · GPIO ISR · bus/UART completion │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartTxDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use tempsampler::adapters::hardware::HardwareAdapter;
use tempsampler::adapters::log_sink::LogEventSink;
use tempsampler::adapters::nvs::NvsAdapter;
use tempsampler::adapters::scope::{ProbeScope, SAMPLING_RATE_PROBE, TEMPERATURE_PROBE};
use tempsampler::app::service::Dispatcher;
use tempsampler::config::SamplerConfig;
use tempsampler::drivers::hw_timer::SampleTimer;
use tempsampler::drivers::i2c_bus::I2cSensorBus;
use tempsampler::drivers::indicator::PinIndicator;
use tempsampler::drivers::trigger;
use tempsampler::drivers::uart_tx::UartTx;
use tempsampler::events::{EventFlags, NotificationQueue};
use tempsampler::pins;

/// Written by the timer task, GPIO ISR and driver completions; read and
/// cleared only by the dispatcher.
static FLAGS: EventFlags = EventFlags::new();

/// Notifications from task-context producers (the esp_timer callback).
static QUEUE: NotificationQueue<8> = NotificationQueue::new();

fn load_config() -> SamplerConfig {
    match NvsAdapter::new() {
        Ok(nvs) => nvs.load_or_reset(),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SamplerConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("TempSampler v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    config.validate()?;
    info!(
        "Config: sensor @0x{:02X} reg {} | i2c {} Hz | timer clock {} Hz | uart {} baud",
        config.sensor_address,
        config.sensor_register,
        config.i2c_baudrate_hz,
        config.timer_clock_hz,
        config.uart_baudrate
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    info!(
        "Pins: sda={} scl={} uart_tx={} led={} trigger={}",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::UART_TX_GPIO,
        pins::LED_GPIO,
        pins::TRIGGER_GPIO
    );

    // Typed pins below must match the numbers in `pins`.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(config.i2c_baudrate_hz)),
    )?;
    let led = PinDriver::output(peripherals.pins.gpio11)?;
    let uart = UartTxDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::new().baudrate(Hertz(config.uart_baudrate)),
    )?;
    let timer = SampleTimer::new(config.timer_clock_hz, &QUEUE)?;
    trigger::install(&FLAGS)?;

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        I2cSensorBus::new(i2c, FLAGS.bus_notifier()),
        PinIndicator::new(led),
        timer,
        UartTx::new(uart, FLAGS.transfer_notifier()),
        ProbeScope::new(&TEMPERATURE_PROBE),
    );
    let mut sink = LogEventSink::new();

    // ── 5. Dispatch ───────────────────────────────────────────
    let mut dispatcher = Dispatcher::new(&config, &FLAGS, &TEMPERATURE_PROBE)
        .with_queue(&QUEUE)
        .with_rate_probe(&SAMPLING_RATE_PROBE);
    dispatcher.start(&mut hw, &mut sink);
    dispatcher.run(&mut hw, &mut sink)
}

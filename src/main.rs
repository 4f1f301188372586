//! TouchlessConsole - main entry point
//!
//! Bootstraps the ESP-IDF peripherals and runs the single cooperative
//! polling pass: read every sensor, tick every button, pump the serial
//! channel, drain diagnostics, sleep one tick. Components never block;
//! the per-pass recovery delay lives here and only here.

#![no_std]
#![no_main]

use esp_idf_svc::sys as esp_idf_sys;

use esp_idf_svc::hal::adc::oneshot::AdcDriver;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::UartDriver;
use esp_idf_svc::sys::EspError;

use touchless_console::{
    button::{Behavior, ButtonConfig, TouchlessButton},
    con_error, con_info,
    hal::range_sensor::RangeSensor,
    hal::serial_port::{self, SerialPortConfig},
    logging::{format_to_buffer, LogStream},
    radio::RadioGroups,
    serial::{MessageSink, SerialChannel},
};

/// Log ring shared between the poll pass and the drain at its tail.
static LOG_STREAM: LogStream = LogStream::new();

/// Threshold window (centimeters) for the stock console buttons.
const NEAR_CM: i32 = 10;
const FAR_CM: i32 = 25;

/// Radio group claimed by the scene-select buttons.
const SCENE_GROUP: u32 = 1;

/// FreeRTOS ticks between poll passes (analog read recovery time).
const POLL_DELAY_TICKS: u32 = 2;

/// The installation's button layout: one id per sensor, wired in the same
/// order as the ADC channels below.
fn button_table() -> [TouchlessButton; 5] {
    [
        TouchlessButton::new(ButtonConfig::new(
            1,
            Some(Behavior::Momentary),
            NEAR_CM,
            FAR_CM,
        )),
        TouchlessButton::new(ButtonConfig::new(2, Some(Behavior::Toggle), NEAR_CM, FAR_CM)),
        TouchlessButton::new(
            ButtonConfig::new(3, Some(Behavior::Radio), NEAR_CM, FAR_CM)
                .with_radio_group(SCENE_GROUP),
        ),
        TouchlessButton::new(
            ButtonConfig::new(4, Some(Behavior::Radio), NEAR_CM, FAR_CM)
                .with_radio_group(SCENE_GROUP),
        ),
        TouchlessButton::new(ButtonConfig::new(
            5,
            Some(Behavior::Continuous),
            NEAR_CM,
            FAR_CM,
        )),
    ]
}

#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    if run().is_err() {
        // Peripheral bring-up failed; park the task rather than reboot-loop.
        loop {
            unsafe {
                esp_idf_sys::vTaskDelay(1000);
            }
        }
    }
}

fn run() -> Result<(), EspError> {
    let peripherals = Peripherals::take()?;

    let adc = AdcDriver::new(peripherals.adc1)?;
    let mut sensor1 = RangeSensor::new(&adc, peripherals.pins.gpio1)?;
    let mut sensor2 = RangeSensor::new(&adc, peripherals.pins.gpio2)?;
    let mut sensor3 = RangeSensor::new(&adc, peripherals.pins.gpio3)?;
    let mut sensor4 = RangeSensor::new(&adc, peripherals.pins.gpio4)?;
    let mut sensor5 = RangeSensor::new(&adc, peripherals.pins.gpio5)?;

    let mut uart = serial_port::init_uart(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        &SerialPortConfig::default(),
    )?;

    let mut buttons = button_table();
    let mut groups = RadioGroups::new();
    for button in &buttons {
        if let Some(group) = button.config().radio_group {
            groups.register(group, button.config().id);
        }
    }
    let mut channel: SerialChannel = SerialChannel::new();

    con_info!(LOG_STREAM, now_ms(), "console up, {} buttons", buttons.len());

    loop {
        let now = now_ms();

        let samples = [
            sensor1.read_distance_cm(),
            sensor2.read_distance_cm(),
            sensor3.read_distance_cm(),
            sensor4.read_distance_cm(),
            sensor5.read_distance_cm(),
        ];

        for (button, sample) in buttons.iter_mut().zip(samples) {
            match sample {
                Ok(raw) => {
                    let mut sink =
                        |id: u32, value: i32| publish_trigger(&mut uart, id, value);
                    button.update(raw, now, &mut groups, &mut sink);
                }
                Err(err) => {
                    con_error!(LOG_STREAM, now, "sensor read failed: {}", err);
                }
            }
        }

        while let Some(byte) = serial_port::try_read_byte(&mut uart) {
            let mut sink = HostLink {
                uart: &mut uart,
                now_ms: now,
            };
            channel.feed(byte, &mut sink);
        }

        drain_logs(&mut uart);

        unsafe {
            esp_idf_sys::vTaskDelay(POLL_DELAY_TICKS);
        }
    }
}

fn now_ms() -> i64 {
    unsafe { esp_idf_sys::esp_timer_get_time() / 1000 }
}

/// Publish a trigger event to the host as an addressed line.
fn publish_trigger(uart: &mut UartDriver<'_>, id: u32, value: i32) {
    let mut line = [0u8; 32];
    let len = format_to_buffer(&mut line, format_args!("/console/b{} {}\n", id, value));
    serial_port::write_all(uart, &line[..len]);
}

/// Channel callbacks wired to the host link.
struct HostLink<'a, 'd> {
    uart: &'a mut UartDriver<'d>,
    now_ms: i64,
}

impl MessageSink for HostLink<'_, '_> {
    fn on_handshake(&mut self) {
        serial_port::write_all(self.uart, b"handshake\n");
        con_info!(LOG_STREAM, self.now_ms, "handshake acknowledged");
    }

    fn on_message(&mut self, address: &str, value: i32) {
        con_info!(LOG_STREAM, self.now_ms, "command {} = {}", address, value);
    }
}

/// Write buffered diagnostics out the host link at the tail of a pass.
fn drain_logs(uart: &mut UartDriver<'_>) {
    while let Some(entry) = LOG_STREAM.drain() {
        let mut line = [0u8; 160];
        let len = format_to_buffer(
            &mut line,
            format_args!(
                "[{:8}] {}: {}\n",
                entry.timestamp_ms,
                entry.level.as_str(),
                core::str::from_utf8(entry.message()).unwrap_or("<invalid utf8>")
            ),
        );
        serial_port::write_all(uart, &line[..len]);
    }

    let dropped = LOG_STREAM.dropped();
    if dropped > 0 {
        let mut line = [0u8; 48];
        let len = format_to_buffer(&mut line, format_args!("[log] dropped {} records\n", dropped));
        serial_port::write_all(uart, &line[..len]);
        LOG_STREAM.reset_dropped();
    }
}

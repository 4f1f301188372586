//! UART transport for the message channel.
//!
//! The host link carries line-delimited ASCII both ways: inbound command
//! and handshake lines, outbound trigger events and diagnostics.

use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver, UART1};
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::sys::EspError;

/// Transport configuration.
pub struct SerialPortConfig {
    pub baud_rate: u32,
}

impl Default for SerialPortConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

/// Open the host-link UART, no flow control.
pub fn init_uart<'d>(
    uart: impl Peripheral<P = UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    config: &SerialPortConfig,
) -> Result<UartDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default().baudrate(Hertz(config.baud_rate));

    UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Non-blocking single-byte read; `None` when the FIFO is empty.
pub fn try_read_byte(uart: &mut UartDriver<'_>) -> Option<u8> {
    let mut byte = [0u8; 1];
    match uart.read(&mut byte, 0) {
        Ok(1) => Some(byte[0]),
        _ => None,
    }
}

/// Write a formatted line; short writes are dropped, never retried, so the
/// polling loop can treat this as fire-and-forget.
pub fn write_all(uart: &mut UartDriver<'_>, bytes: &[u8]) {
    let _ = uart.write(bytes);
}

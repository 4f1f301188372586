//! Analog IR distance sensor input via the oneshot ADC.
//!
//! The console uses Sharp GP2D12-class sensors: output voltage falls off
//! roughly as the inverse of distance, with a usable band of about
//! 10-80 cm. The conversion here mirrors the datasheet curve fit
//! `distance_cm ≈ 13 / volts`.

use esp_idf_svc::hal::adc::attenuation::DB_11;
use esp_idf_svc::hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_svc::hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_svc::hal::gpio::ADCPin;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::EspError;

/// Reported distance when the sensor reads no reflection at all.
pub const OUT_OF_RANGE_CM: i32 = 150;

/// One proximity sensor channel, read once per poll pass.
pub struct RangeSensor<'d, T: ADCPin> {
    channel: AdcChannelDriver<'d, T, &'d AdcDriver<'d, T::Adc>>,
}

impl<'d, T: ADCPin> RangeSensor<'d, T> {
    /// Attach a sensor to an ADC pin.
    ///
    /// Full-range attenuation: the GP2D12 swings up to ~2.6 V at its near
    /// limit, above the default ADC window.
    pub fn new(
        adc: &'d AdcDriver<'d, T::Adc>,
        pin: impl Peripheral<P = T> + 'd,
    ) -> Result<Self, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            calibration: true,
            ..Default::default()
        };
        Ok(Self {
            channel: AdcChannelDriver::new(adc, pin, &config)?,
        })
    }

    /// Read one raw distance sample in centimeters.
    pub fn read_distance_cm(&mut self) -> Result<i32, EspError> {
        let millivolts = self.channel.read()?;
        Ok(millivolts_to_cm(millivolts))
    }
}

/// Datasheet curve fit: `distance_cm = 13 / volts`, clamped to the
/// out-of-range ceiling so a dark sensor never divides by zero.
fn millivolts_to_cm(millivolts: u16) -> i32 {
    if millivolts == 0 {
        return OUT_OF_RANGE_CM;
    }
    (13_000 / millivolts as i32).min(OUT_OF_RANGE_CM)
}

use embedded_hal::blocking::delay::DelayUs;

use crate::config::{BANDGAP_SETTLE_US, REFERENCE_READINGS};
use crate::hal::{AnalogInput, Channel, Mux};

const RESULT_MASK: u16 = 0x03FF;

/// Reads the ADC with the CPU asleep during the conversion.
pub struct Sampler<A, D> {
    adc: A,
    delay: D,
}

impl<A: AnalogInput, D: DelayUs<u16>> Sampler<A, D> {
    pub fn new(adc: A, delay: D) -> Self {
        Self { adc, delay }
    }

    /// One 10 bit reading.
    ///
    /// Switching to the bandgap needs [`BANDGAP_SETTLE_US`] before the first
    /// conversion; `Mux::Same` skips both the reselect and the wait.
    pub fn read(&mut self, mux: Mux) -> u16 {
        if let Mux::Channel(channel) = mux {
            self.adc.select(channel);
            if channel == Channel::Bandgap {
                self.delay.delay_us(BANDGAP_SETTLE_US);
            }
        }

        self.adc.sleep_until_converted();
        // Only spins if something other than the ADC woke us up.
        let raw = nb::block!(self.adc.result()).unwrap_or_else(|never| match never {});
        raw & RESULT_MASK
    }

    /// Mean of [`REFERENCE_READINGS`] bandgap readings, truncated.
    ///
    /// The bandgap cannot be reselected inside the 1 ms loop (it needs 1 ms to
    /// settle), so it is measured once at start-up.
    pub fn calibrate_reference(&mut self) -> u16 {
        let mut sum = self.read(Mux::Channel(Channel::Bandgap)) as u32;
        for _ in 1..REFERENCE_READINGS {
            sum += self.read(Mux::Same) as u32;
        }
        (sum / REFERENCE_READINGS) as u16
    }

    pub fn release(self) -> (A, D) {
        (self.adc, self.delay)
    }
}

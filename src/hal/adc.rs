use core::convert::Infallible;

use avr_device::attiny85::ADC;

use super::power::{Power, SleepMode};
use super::{AnalogInput, Channel};

const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
const ADIE: u8 = 1 << 3;
// Prescaler 64: 115.2 kHz ADC clock at 7.3728 MHz, inside the 50-200 kHz window.
const ADPS_DIV64: u8 = 0b110;

pub struct Adc {
    adc: ADC,
    power: Power,
}

impl Adc {
    /// Enables the converter and its completion interrupt. Vcc is the reference.
    pub fn new(adc: ADC, power: Power) -> Self {
        adc.adcsra.write(|w| unsafe { w.bits(ADEN | ADIE | ADPS_DIV64) });
        adc.admux.write(|w| unsafe { w.bits(0) });
        Self { adc, power }
    }
}

impl AnalogInput for Adc {
    #[inline]
    fn select(&mut self, channel: Channel) {
        // REFS = 000: Vcc as reference, right adjusted result.
        self.adc.admux.write(|w| unsafe { w.bits(channel as u8) });
    }

    #[inline]
    fn sleep_until_converted(&mut self) {
        // Entering ADC noise reduction mode starts the conversion.
        self.power.sleep(SleepMode::AdcNoiseReduction);
    }

    #[inline]
    fn result(&mut self) -> nb::Result<u16, Infallible> {
        if self.adc.adcsra.read().bits() & ADSC != 0 {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.adc.adc.read().bits())
    }
}

// Only here to end the noise reduction sleep. Without a handler the vector
// would jump to the reset address.
#[avr_device::interrupt(attiny85)]
fn ADC() {}

use core::convert::Infallible;

use avr_device::attiny85::{CPU, PORTB};
use embedded_hal::digital::v2::ToggleableOutputPin;

use crate::config::OSCILLATOR_CAL;

pub const TICK_PIN: u8 = 0;
pub const TX_PIN: u8 = 1;

/// Clock and pin bring-up. Must run before the peripherals are handed out.
pub fn board_init(cpu: &CPU, port: &PORTB) {
    // Trims the RC oscillator to 7.3728 MHz (CKDIV8 fuse cleared).
    cpu.osccal.write(|w| unsafe { w.bits(OSCILLATOR_CAL) });

    port.ddrb.write(|w| unsafe { w.bits((1 << TICK_PIN) | (1 << TX_PIN)) });
    // UART idle level is high.
    port.portb.write(|w| unsafe { w.bits(1 << TX_PIN) });
}

/// PB0, toggled once per loop iteration so the period can be checked on a scope.
pub struct TickPin {
    port: PORTB,
}

impl TickPin {
    pub fn new(port: PORTB) -> Self {
        Self { port }
    }
}

impl ToggleableOutputPin for TickPin {
    type Error = Infallible;

    #[inline(always)]
    fn toggle(&mut self) -> Result<(), Infallible> {
        // Writing a one to PINB toggles the PORTB bit.
        self.port.pinb.write(|w| unsafe { w.bits(1 << TICK_PIN) });
        Ok(())
    }
}
